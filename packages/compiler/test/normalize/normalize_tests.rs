/**
 * Normalizer tests
 *
 * Name resolution per call position, symbol allocation, keywords, component
 * invocation and the scoping errors the normalizer reports.
 */

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glimmer_compiler::v1::LiteralValue;
    use glimmer_compiler::v2::{
        AttrValue, Content, ElementAttr, Expr, FreeVarResolution, PathExpr, Template, VariableReference,
    };
    use glimmer_compiler::{normalize, PreprocessOptions, SyntaxError};
    use serde_json::json;

    fn loose(text: &str) -> Template {
        normalize_with(text, &PreprocessOptions::default())
    }

    fn normalize_with(text: &str, options: &PreprocessOptions) -> Template {
        match normalize(text, options) {
            Ok(template) => template,
            Err(error) => panic!("unexpected syntax error:\n{error}"),
        }
    }

    fn error(text: &str, options: &PreprocessOptions) -> SyntaxError {
        match normalize(text, options) {
            Ok(template) => panic!("expected an error for {text:?}, got {template:?}"),
            Err(error) => error,
        }
    }

    fn loose_error(text: &str) -> (&'static str, Option<serde_json::Value>) {
        let error = error(text, &PreprocessOptions::default());
        (error.code(), error.payload())
    }

    fn append(content: &Content) -> &Expr {
        match content {
            Content::Append(append) => &append.value,
            other => panic!("expected an append, got {other:?}"),
        }
    }

    fn reference(expr: &Expr) -> (&VariableReference, &[String]) {
        match expr {
            Expr::Path(PathExpr { reference, tail, .. }) => (reference, tail.as_slice()),
            other => panic!("expected a path, got {other:?}"),
        }
    }

    fn free(name: &str, resolution: FreeVarResolution, upvar: u32) -> VariableReference {
        VariableReference::Free {
            name: name.to_string(),
            resolution,
            upvar,
        }
    }

    mod loose_resolution {
        use super::*;

        #[test]
        fn should_resolve_bare_appends_with_this_fallback() {
            let template = loose("{{greeting}}");
            assert_eq!(
                reference(append(&template.body[0])).0,
                &free("greeting", FreeVarResolution::ComponentOrHelperOrThisFallback, 0)
            );
            assert_eq!(template.table.upvars, vec!["greeting".to_string()]);
        }

        #[test]
        fn should_drop_the_fallback_when_arguments_are_passed() {
            let template = loose("{{format value}}");
            let Expr::Call(call) = append(&template.body[0]) else {
                panic!("expected a call");
            };
            assert_eq!(
                reference(&call.callee).0,
                &free("format", FreeVarResolution::ComponentOrHelper, 0)
            );
            let (value, tail) = reference(&call.args.positional[0]);
            assert_eq!(value, &VariableReference::This);
            assert_eq!(tail, ["value".to_string()]);
        }

        #[test]
        fn should_read_dotted_free_names_from_this() {
            let template = loose("{{user.name}}");
            let (head, tail) = reference(append(&template.body[0]));
            assert_eq!(head, &VariableReference::This);
            assert_eq!(tail, ["user".to_string(), "name".to_string()]);
            assert!(template.table.upvars.is_empty());
        }

        #[test]
        fn should_resolve_by_position() {
            let template = loose(r#"<div class={{cls}} {{on "click"}}>{{#list}}{{/list}}{{x (helper)}}</div>"#);
            let Content::Element(div) = &template.body[0] else {
                panic!("expected an element");
            };
            let ElementAttr::Html(class) = &div.attrs[0] else {
                panic!("expected an attribute");
            };
            let AttrValue::Dynamic(value) = &class.value else {
                panic!("expected a dynamic value");
            };
            assert_eq!(reference(value).0, &free("cls", FreeVarResolution::HelperOrThisFallback, 0));
            assert_eq!(
                reference(&div.modifiers[0].callee).0,
                &free("on", FreeVarResolution::Modifier, 1)
            );
            let Content::InvokeBlock(list) = &div.body[0] else {
                panic!("expected a block");
            };
            assert_eq!(reference(&list.callee).0, &free("list", FreeVarResolution::Component, 2));
            let Expr::Call(call) = append(&div.body[1]) else {
                panic!("expected a call");
            };
            let Expr::Call(helper) = &call.args.positional[0] else {
                panic!("expected a sub expression call");
            };
            assert!(helper.args.is_empty());
            assert_eq!(reference(&helper.callee).0, &free("helper", FreeVarResolution::Helper, 4));
        }

        #[test]
        fn should_resolve_component_arguments_with_the_deprecated_fallback() {
            let template = loose("<Card @title={{heading}} />");
            let Content::Component(card) = &template.body[0] else {
                panic!("expected a component");
            };
            assert_eq!(reference(&card.callee).0, &free("Card", FreeVarResolution::Component, 0));
            assert_eq!(card.args[0].name, "@title");
            assert_eq!(
                reference(&card.args[0].value).0,
                &free("heading", FreeVarResolution::DeprecatedHelperOrThisFallback, 1)
            );
            assert!(card.blocks.is_empty());
        }

        #[test]
        fn should_share_upvars_between_uses() {
            let template = loose("{{t}}{{t}}");
            assert_eq!(template.table.upvars, vec!["t".to_string()]);
        }
    }

    mod symbols {
        use super::*;

        #[test]
        fn should_allocate_block_params() {
            let template = loose("{{#each items as |item index|}}{{item}}{{/each}}");
            let Content::Each(each) = &template.body[0] else {
                panic!("expected an each");
            };
            assert_eq!(each.block.parameters, vec![1, 2]);
            assert_eq!(
                reference(append(&each.block.body[0])).0,
                &VariableReference::Local {
                    name: "item".to_string(),
                    symbol: 1,
                    depth: 0,
                }
            );
            assert_eq!(template.table.symbols, vec!["item".to_string(), "index".to_string()]);
        }

        #[test]
        fn should_count_frames_to_outer_locals() {
            let template = loose("{{#let a as |x|}}{{#let b as |y|}}{{x}}{{y}}{{/let}}{{/let}}");
            let Content::Let(outer) = &template.body[0] else {
                panic!("expected a let");
            };
            let Content::Let(inner) = &outer.block.body[0] else {
                panic!("expected a nested let");
            };
            assert_eq!(
                reference(append(&inner.block.body[0])).0,
                &VariableReference::Local {
                    name: "x".to_string(),
                    symbol: 1,
                    depth: 1,
                }
            );
            assert_eq!(
                reference(append(&inner.block.body[1])).0,
                &VariableReference::Local {
                    name: "y".to_string(),
                    symbol: 2,
                    depth: 0,
                }
            );
        }

        #[test]
        fn should_give_shadowing_params_their_own_slot() {
            let template = loose("{{#each a as |item|}}{{#each item as |item|}}{{item}}{{/each}}{{/each}}");
            assert_eq!(template.table.symbols, vec!["item".to_string(), "item".to_string()]);
        }

        #[test]
        fn should_share_argument_symbols() {
            let template = loose("{{@title}}<p title={{@title}}></p>");
            assert_eq!(
                reference(append(&template.body[0])).0,
                &VariableReference::Arg {
                    name: "@title".to_string(),
                    symbol: 1,
                }
            );
            assert_eq!(template.table.symbols, vec!["@title".to_string()]);
        }

        #[test]
        fn should_let_locals_shadow_keywords() {
            let template = loose("{{#let 1 as |if|}}{{if}}{{/let}}");
            let Content::Let(node) = &template.body[0] else {
                panic!("expected a let");
            };
            assert!(matches!(
                reference(append(&node.block.body[0])).0,
                VariableReference::Local { name, .. } if name == "if"
            ));
        }
    }

    mod strict_mode {
        use super::*;

        #[test]
        fn should_reject_unresolved_names() {
            let error = error("{{greeting}}", &PreprocessOptions::strict());
            assert_eq!(error.code(), "strict-mode.unresolved-variable");
            assert_eq!(error.payload(), Some(json!("greeting")));
        }

        #[test]
        fn should_reject_unresolved_components() {
            let error = error("<Greeting />", &PreprocessOptions::strict());
            assert_eq!(error.payload(), Some(json!("Greeting")));
        }

        #[test]
        fn should_resolve_embedder_locals_lexically() {
            let options = PreprocessOptions::strict().with_locals(["Greeting", "t", "unused"]);
            let template = normalize_with("<Greeting @msg={{t \"hi\"}} />{{t \"bye\"}}", &options);
            let Content::Component(component) = &template.body[0] else {
                panic!("expected a component");
            };
            assert_eq!(
                reference(&component.callee).0,
                &VariableReference::Lexical {
                    name: "Greeting".to_string(),
                    upvar: 0,
                }
            );
            assert_eq!(template.table.used_locals, vec!["Greeting".to_string(), "t".to_string()]);
            assert_eq!(template.table.upvars, vec!["Greeting".to_string(), "t".to_string()]);
        }

        #[test]
        fn should_let_embedder_locals_shadow_keywords() {
            let options = PreprocessOptions::strict().with_locals(["if"]);
            let template = normalize_with("{{if}}", &options);
            assert!(matches!(
                reference(append(&template.body[0])).0,
                VariableReference::Lexical { name, .. } if name == "if"
            ));
        }

        #[test]
        fn should_still_resolve_keywords() {
            let template = normalize_with("{{#if @show}}{{yield}}{{/if}}", &PreprocessOptions::strict());
            assert!(matches!(template.body[0], Content::If(_)));
        }
    }

    mod keywords {
        use super::*;

        #[test]
        fn should_negate_unless() {
            let template = loose("{{#unless @hidden}}shown{{/unless}}");
            let Content::If(node) = &template.body[0] else {
                panic!("expected an if");
            };
            assert!(matches!(&node.condition, Expr::Not { .. }));
        }

        #[test]
        fn should_validate_block_keyword_arguments() {
            assert_eq!(
                loose_error("{{#if a b}}x{{/if}}"),
                (
                    "keywords.invalid-usage",
                    Some(json!({ "keyword": "if", "reason": "it takes exactly one positional argument" }))
                )
            );
            assert_eq!(loose_error("{{#each a bad=1}}x{{/each}}").0, "keywords.invalid-usage");
            assert_eq!(loose_error("{{#let a}}x{{else}}y{{/let}}").0, "keywords.invalid-usage");
        }

        #[test]
        fn should_allocate_yield_targets() {
            let template = loose(r#"{{yield 1 to="inverse"}}{{has-block "inverse"}}"#);
            let Content::Yield(node) = &template.body[0] else {
                panic!("expected a yield");
            };
            assert_eq!(node.to, 1);
            assert_eq!(node.positional.len(), 1);
            assert!(matches!(append(&template.body[1]), Expr::HasBlock { target: 1, .. }));
            assert_eq!(template.table.symbols, vec!["&else".to_string()]);
        }

        #[test]
        fn should_build_inline_if() {
            let template = loose(r#"{{if @on "yes"}}"#);
            let Expr::IfInline(node) = append(&template.body[0]) else {
                panic!("expected an inline if");
            };
            assert!(node.falsy.is_none());
            assert!(matches!(
                node.truthy.as_ref(),
                Expr::Literal(literal) if literal.value == LiteralValue::String("yes".to_string())
            ));
        }

        #[test]
        fn should_record_debugger_scope() {
            let template = loose("{{#each xs as |x|}}{{debugger}}{{/each}}");
            assert!(template.table.has_eval);
            let Content::Each(each) = &template.body[0] else {
                panic!("expected an each");
            };
            let Content::Debugger(debugger) = &each.block.body[0] else {
                panic!("expected a debugger");
            };
            assert_eq!(debugger.scope, vec![1]);
        }

        #[test]
        fn should_reject_content_keywords_in_value_positions() {
            assert_eq!(
                loose_error("<div class={{yield}}></div>"),
                (
                    "keywords.invalid-usage",
                    Some(json!({ "keyword": "yield", "reason": "it can only be used as content" }))
                )
            );
            assert_eq!(loose_error("{{debugger 1}}").0, "keywords.invalid-usage");
        }

        #[test]
        fn should_build_log() {
            let template = loose("{{log @a 1}}");
            assert!(matches!(append(&template.body[0]), Expr::Log { positional, .. } if positional.len() == 2));
        }
    }

    mod components {
        use super::*;

        #[test]
        fn should_put_children_in_the_default_block() {
            let template = loose("<Card as |c|>{{c}}</Card>");
            let Content::Component(card) = &template.body[0] else {
                panic!("expected a component");
            };
            assert_eq!(card.blocks.len(), 1);
            assert_eq!(card.blocks[0].name, "default");
            assert_eq!(card.blocks[0].block.parameters, vec![1]);
        }

        #[test]
        fn should_collect_named_blocks() {
            let template = loose("<Card>\n  <:header>h</:header>\n  {{! between }}\n  <:body as |b|>{{b}}</:body>\n</Card>");
            let Content::Component(card) = &template.body[0] else {
                panic!("expected a component");
            };
            let names: Vec<&str> = card.blocks.iter().map(|block| block.name.as_str()).collect();
            assert_eq!(names, vec!["header", "body"]);
            assert_eq!(card.blocks[1].block.parameters, vec![1]);
        }

        #[test]
        fn should_reject_content_beside_named_blocks() {
            assert_eq!(
                loose_error("<Card><:header>h</:header>stray</Card>"),
                ("elements.named-blocks-mixed", Some(json!("Card")))
            );
            assert_eq!(
                loose_error("<Card as |x|><:header>h</:header></Card>").0,
                "elements.named-blocks-mixed"
            );
        }

        #[test]
        fn should_reject_named_blocks_outside_components() {
            assert_eq!(
                loose_error("<div><:header>h</:header></div>"),
                ("elements.named-block-outside-component", Some(json!("header")))
            );
        }

        #[test]
        fn should_classify_component_tags() {
            let template = loose("<this.Item /><@slot /><ui.Button />");
            let heads: Vec<(VariableReference, Vec<String>)> = template
                .body
                .iter()
                .map(|content| match content {
                    Content::Component(component) => {
                        let (head, tail) = reference(&component.callee);
                        (head.clone(), tail.to_vec())
                    }
                    other => panic!("expected a component, got {other:?}"),
                })
                .collect();
            assert_eq!(heads[0], (VariableReference::This, vec!["Item".to_string()]));
            assert_eq!(
                heads[1],
                (
                    VariableReference::Arg {
                        name: "@slot".to_string(),
                        symbol: 1,
                    },
                    Vec::new()
                )
            );
            assert_eq!(
                heads[2],
                (VariableReference::This, vec!["ui".to_string(), "Button".to_string()])
            );
        }

        #[test]
        fn should_customize_free_component_names() {
            let options = PreprocessOptions {
                customize_component_name: Some(Arc::new(|name: &str| format!("x-{}", name.to_lowercase()))),
                ..PreprocessOptions::default()
            };
            let template = normalize_with("<Card />", &options);
            assert_eq!(template.table.upvars, vec!["x-card".to_string()]);
        }

        #[test]
        fn should_treat_lowercase_tags_as_html() {
            let template = loose("<card-list></card-list>");
            assert!(matches!(&template.body[0], Content::Element(element) if element.tag == "card-list"));
        }
    }

    mod simple_elements {
        use super::*;

        #[test]
        fn should_reject_block_params() {
            assert_eq!(
                loose_error("<div as |x|></div>"),
                ("block-params.on-simple-element", Some(json!("div")))
            );
        }

        #[test]
        fn should_reject_arguments() {
            assert_eq!(
                loose_error(r#"<div @title="x"></div>"#),
                ("attrs.arg-on-simple-element", Some(json!("@title")))
            );
        }

        #[test]
        fn should_allocate_the_attrs_block_for_splattributes() {
            let template = loose("<div ...attributes></div>");
            let Content::Element(div) = &template.body[0] else {
                panic!("expected an element");
            };
            assert!(div.has_splat());
            assert_eq!(template.table.symbols, vec!["&attrs".to_string()]);
        }

        #[test]
        fn should_interpolate_quoted_values() {
            let template = loose(r#"<div class="a {{b}}"></div>"#);
            let Content::Element(div) = &template.body[0] else {
                panic!("expected an element");
            };
            let ElementAttr::Html(class) = &div.attrs[0] else {
                panic!("expected an attribute");
            };
            let AttrValue::Dynamic(Expr::Interpolate(interpolate)) = &class.value else {
                panic!("expected an interpolation");
            };
            assert_eq!(interpolate.parts.len(), 2);
        }

        #[test]
        fn should_reject_partials() {
            assert_eq!(loose_error("{{> sidebar}}").0, "hbs.syntax.partial-unsupported");
        }
    }
}
