/**
 * Initial render tests
 *
 * Static and dynamic content, attributes, namespaces, trusted HTML, helpers,
 * strict mode scope values and the errors a render can fail with.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{factory, strict_template, template, tracked, Harness};
    use glimmer_compiler::wire_format::names::XLINK;
    use glimmer_compiler::wire_format::{Expression, Statement};
    use glimmer_compiler::{PreprocessOptions, SerializedTemplateBlock, WireFormatError};
    use glimmer_runtime::dom::SVG_NAMESPACE;
    use glimmer_runtime::{
        Capabilities, DomError, DomOperations, RenderError, ScopeValue, TemplateFactory, Value,
    };
    use serde_json::json;

    mod static_content {
        use super::*;

        #[test]
        fn should_render_elements_text_and_comments() {
            let harness = Harness::new();
            harness.render(r#"<p class="lead">hi <b>there</b></p><!-- note -->"#, Value::Null);
            assert_eq!(harness.html(), r#"<p class="lead">hi <b>there</b></p><!-- note -->"#);
        }

        #[test]
        fn should_not_close_void_elements() {
            let harness = Harness::new();
            harness.render(r#"<input type="text"><br>"#, Value::Null);
            assert_eq!(harness.html(), r#"<input type="text"><br>"#);
        }
    }

    mod dynamic_content {
        use super::*;

        #[test]
        fn should_render_properties_of_this() {
            let harness = Harness::new();
            harness.render("<div>{{this.name}}</div>", tracked(json!({ "name": "Ada" })));
            assert_eq!(harness.html(), "<div>Ada</div>");
        }

        #[test]
        fn should_fall_back_to_this_for_unknown_free_names() {
            let harness = Harness::new();
            harness.render("{{name}}", tracked(json!({ "name": "Ada" })));
            assert_eq!(harness.html(), "Ada");
        }

        #[test]
        fn should_render_named_arguments() {
            let harness = Harness::new();
            harness.render_with_args(
                "{{@greeting}}, {{this.name}}",
                tracked(json!({ "name": "Ada" })),
                &[("greeting", Value::from("Hello"))],
            );
            assert_eq!(harness.html(), "Hello, Ada");
        }

        #[test]
        fn should_render_nothing_for_null_and_undefined() {
            let harness = Harness::new();
            harness.render("[{{this.missing}}{{this.none}}]", tracked(json!({ "none": null })));
            assert_eq!(harness.html(), "[]");
        }

        #[test]
        fn should_escape_text() {
            let harness = Harness::new();
            harness.render("{{this.text}}", tracked(json!({ "text": "<b>&</b>" })));
            assert_eq!(harness.html(), "&lt;b&gt;&amp;&lt;/b&gt;");
        }

        #[test]
        fn should_concatenate_attribute_values() {
            let harness = Harness::new();
            harness.render(r#"<a href="/u/{{this.id}}">x</a>"#, tracked(json!({ "id": 7 })));
            assert_eq!(harness.html(), r#"<a href="/u/7">x</a>"#);
        }

        #[test]
        fn should_drop_false_and_missing_attributes() {
            let harness = Harness::new();
            harness.render(
                "<button disabled={{this.off}} title={{this.none}} hidden={{this.on}}></button>",
                tracked(json!({ "off": false, "on": true })),
            );
            assert_eq!(harness.html(), r#"<button hidden=""></button>"#);
        }

        #[test]
        fn should_render_inline_if() {
            let harness = Harness::new();
            harness.render(
                r#"{{if this.ok "yes" "no"}}/{{unless this.ok "yes" "no"}}"#,
                tracked(json!({ "ok": true })),
            );
            assert_eq!(harness.html(), "yes/no");
        }
    }

    mod helpers {
        use super::*;

        #[test]
        fn should_call_registered_helpers() {
            let capabilities = Capabilities::new().with_helper("shout", |args| {
                Value::from(args.positional(0).to_display_string().to_uppercase())
            });
            let harness = Harness::with(capabilities);
            harness.render("{{shout this.name}}!", tracked(json!({ "name": "ada" })));
            assert_eq!(harness.html(), "ADA!");
        }

        #[test]
        fn should_pass_named_arguments() {
            let capabilities = Capabilities::new().with_helper("join", |args| {
                let separator = args.named("with").to_display_string();
                Value::from(
                    args.positional
                        .iter()
                        .map(Value::to_display_string)
                        .collect::<Vec<_>>()
                        .join(&separator),
                )
            });
            let harness = Harness::with(capabilities);
            harness.render(r#"{{join "a" "b" with="-"}}"#, Value::Null);
            assert_eq!(harness.html(), "a-b");
        }

        #[test]
        fn should_fail_on_unknown_helpers() {
            let harness = Harness::new();
            let error = harness.try_render("{{format this.x}}", Value::Null).unwrap_err();
            assert_eq!(error, RenderError::UnknownHelper("format".to_string()));
        }
    }

    mod strict_mode {
        use super::*;

        #[test]
        fn should_read_lexical_values_and_helpers() {
            let harness = Harness::new();
            let template = strict_template(
                r#"{{t "hello"}} {{name}}"#,
                vec![
                    ("t", ScopeValue::helper(|args| Value::from(format!("<{}>", args.positional(0).to_display_string())))),
                    ("name", ScopeValue::value("Ada")),
                ],
            );
            template.render(&harness.env, Value::Null, harness.root).unwrap();
            assert_eq!(harness.html(), "&lt;hello&gt; Ada");
        }

        #[test]
        fn should_reject_a_helper_used_as_a_modifier() {
            let harness = Harness::new();
            let template = strict_template(
                "<div {{t}}></div>",
                vec![("t", ScopeValue::helper(|_| Value::Undefined))],
            );
            let error = template.render(&harness.env, Value::Null, harness.root).unwrap_err();
            assert_eq!(
                error,
                RenderError::InvalidLexical {
                    name: "t".to_string(),
                    expected: "modifier",
                }
            );
        }

        #[test]
        fn should_require_one_value_per_used_local() {
            let factory = factory("{{t}}", PreprocessOptions::strict().with_locals(["t"]));
            assert_eq!(factory.scope(), ["t".to_string()]);
            assert_eq!(
                factory.create(Vec::new()).unwrap_err(),
                RenderError::ScopeMismatch { expected: 1, found: 0 }
            );
        }

        #[test]
        fn should_reject_symbols_missing_from_the_symbol_table() {
            let block = SerializedTemplateBlock {
                statements: vec![Statement::Append {
                    value: Expression::GetSymbol {
                        symbol: 3,
                        tail: Vec::new(),
                    },
                    trusting: false,
                }],
                symbols: vec!["@a".to_string()],
                ..SerializedTemplateBlock::default()
            };
            let factory = TemplateFactory::from_block("t", block, Vec::new());
            assert_eq!(
                factory.create(Vec::new()).unwrap_err(),
                RenderError::WireFormat(WireFormatError::OutOfRange {
                    table: "symbol",
                    index: 3
                })
            );
        }
    }

    mod namespaces {
        use super::*;

        #[test]
        fn should_create_svg_elements_in_the_svg_namespace() {
            let harness = Harness::new();
            harness.render(r##"<svg><use xlink:href="#a"></use></svg><div></div>"##, Value::Null);
            let children = harness.doc.children(harness.root);
            let svg = children[0];
            let child = harness.doc.first_child(svg).unwrap();
            assert_eq!(harness.doc.namespace_of(svg).as_deref(), Some(SVG_NAMESPACE));
            assert_eq!(harness.doc.namespace_of(child).as_deref(), Some(SVG_NAMESPACE));
            assert_eq!(harness.doc.namespace_of(children[1]), None);
            assert_eq!(harness.doc.attribute_namespace(child, "xlink:href").as_deref(), Some(XLINK));
        }

        #[test]
        fn should_leave_svg_at_foreign_object() {
            let harness = Harness::new();
            harness.render("<svg><foreignObject><p>x</p></foreignObject></svg>", Value::Null);
            let svg = harness.doc.children(harness.root)[0];
            let foreign = harness.doc.first_child(svg).unwrap();
            let p = harness.doc.first_child(foreign).unwrap();
            assert_eq!(harness.doc.namespace_of(foreign).as_deref(), Some(SVG_NAMESPACE));
            assert_eq!(harness.doc.namespace_of(p), None);
        }
    }

    mod trusted_html {
        use super::*;

        #[test]
        fn should_insert_html_unescaped() {
            let harness = Harness::new();
            harness.render("<div>{{{this.html}}}</div>", tracked(json!({ "html": "<b>bold</b>" })));
            assert_eq!(harness.html(), "<div><b>bold</b></div>");
        }

        #[test]
        fn should_refuse_html_inside_svg() {
            let harness = Harness::new();
            let error = harness
                .try_render("<svg>{{{this.html}}}</svg>", tracked(json!({ "html": "<b>x</b>" })))
                .unwrap_err();
            assert_eq!(
                error,
                RenderError::Dom(DomError::HtmlInForeignElement {
                    tag: "svg".to_string(),
                    namespace: SVG_NAMESPACE.to_string(),
                })
            );
        }
    }

    mod unsupported {
        use super::*;

        #[test]
        fn should_reject_component_invocations() {
            let harness = Harness::new();
            let error = harness.try_render("<Foo />", Value::Null).unwrap_err();
            assert_eq!(error, RenderError::Unsupported("component invocation"));
        }

        #[test]
        fn should_reject_unknown_modifiers() {
            let harness = Harness::new();
            let error = harness.try_render(r#"<div {{on "click" this.go}}></div>"#, Value::Null).unwrap_err();
            assert_eq!(error, RenderError::UnknownModifier("on".to_string()));
        }
    }

    mod bounds {
        use super::*;

        #[test]
        fn should_span_the_rendered_nodes() {
            let harness = Harness::new();
            let result = harness.render("a<b></b>c", Value::Null);
            let children = harness.doc.children(harness.root);
            assert_eq!(result.first_node(), Some(children[0]));
            assert_eq!(result.last_node(), Some(children[2]));
            assert_eq!(result.parent_element(), harness.root);
        }

        #[test]
        fn should_remove_its_nodes_when_destroyed() {
            let harness = Harness::new();
            let before = harness.doc.create_text_node("kept");
            harness.doc.insert_before(harness.root, before, None);
            let result = harness.render("<p>gone</p>", Value::Null);
            harness.env.transaction(|tx| result.destroy(tx));
            assert_eq!(harness.html(), "kept");
        }

        #[test]
        fn should_expose_template_metadata() {
            let template = template("{{@x}}{{debugger}}");
            assert_eq!(template.symbols(), ["@x".to_string()]);
            assert!(template.has_eval());
            assert_eq!(template.module_name(), "an unknown module");
        }
    }
}
