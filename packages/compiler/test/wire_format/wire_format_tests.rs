/**
 * Wire format tests
 *
 * The JSON layout of compiled templates, decoding it back into typed
 * opcodes, and the readable debug form.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{compile, compile_with, debug, statements};
    use glimmer_compiler::wire_format::{Op, Statement};
    use glimmer_compiler::{precompile_json, PreprocessOptions, SerializedTemplateBlock, WireFormatError};
    use serde_json::json;

    mod content {
        use super::*;

        #[test]
        fn should_write_the_four_part_block() {
            assert_eq!(compile("hi"), json!([[[1, "hi"]], [], false, []]));
        }

        #[test]
        fn should_append_text_and_comments() {
            assert_eq!(statements("<!-- c -->"), json!([[3, " c "]]));
            assert_eq!(statements("a{{! gone }}b"), json!([[1, "a"], [1, "b"]]));
        }

        #[test]
        fn should_append_lookups() {
            assert_eq!(compile("{{@name}}"), json!([[[1, [30, 1]]], ["@name"], false, []]));
            assert_eq!(statements("{{this.a.b}}"), json!([[1, [30, 0, ["a", "b"]]]]));
            assert_eq!(compile("{{foo}}"), json!([[[1, [34, 0]]], [], false, ["foo"]]));
            assert_eq!(statements("{{{html}}}"), json!([[2, [34, 0]]]));
        }

        #[test]
        fn should_append_calls() {
            assert_eq!(
                compile(r#"{{format @d style="short"}}"#),
                json!([
                    [[1, [28, [35, 0], [[30, 1]], [["style"], ["short"]]]]],
                    ["@d"],
                    false,
                    ["format"]
                ])
            );
            assert_eq!(
                statements("{{foo undefined null true 2.5 3}}"),
                json!([[1, [28, [35, 0], [[27], null, true, 2.5, 3], null]]])
            );
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_intern_common_tag_and_attribute_names() {
            assert_eq!(
                statements(r#"<div class="x">hi</div>"#),
                json!([[10, 0], [14, 0, "x"], [12], [1, "hi"], [13]])
            );
            assert_eq!(
                statements("<section data-x={{@x}}></section>"),
                json!([[10, "section"], [15, "data-x", [30, 1]], [12], [13]])
            );
        }

        #[test]
        fn should_concat_interpolated_attributes() {
            assert_eq!(
                statements(r#"<a href="/u/{{id}}">x</a>"#),
                json!([[10, 3], [15, 6, [29, ["/u/", [36, 0]]]], [12], [1, "x"], [13]])
            );
        }

        #[test]
        fn should_mark_trusting_attributes() {
            assert_eq!(
                statements("<div title={{{raw}}}></div>"),
                json!([[10, 0], [22, "title", [36, 0]], [12], [13]])
            );
        }

        #[test]
        fn should_write_attribute_namespaces() {
            assert_eq!(
                statements(r##"<svg><use xlink:href="#i"></use></svg>"##),
                json!([
                    [10, "svg"],
                    [12],
                    [10, "use"],
                    [14, "xlink:href", "#i", "http://www.w3.org/1999/xlink"],
                    [12],
                    [13],
                    [13]
                ])
            );
        }

        #[test]
        fn should_write_modifiers_after_attributes() {
            assert_eq!(
                statements(r#"<div {{on "click" this.go}} id="x"></div>"#),
                json!([[10, 0], [14, 1, "x"], [4, [38, 0], ["click", [30, 0, ["go"]]], null], [12], [13]])
            );
        }
    }

    mod keywords {
        use super::*;

        #[test]
        fn should_compile_if_and_unless() {
            assert_eq!(
                statements("{{#if @a}}y{{else}}n{{/if}}"),
                json!([[41, [30, 1], [[[1, "y"]], []], [[[1, "n"]], []]]])
            );
            assert_eq!(
                statements("{{#unless @a}}x{{/unless}}"),
                json!([[41, [51, [30, 1]], [[[1, "x"]], []], null]])
            );
        }

        #[test]
        fn should_compile_each_with_a_key() {
            assert_eq!(
                compile(r#"{{#each @items key="id" as |item|}}{{item.name}}{{/each}}"#),
                json!([
                    [[42, [30, 1], "id", [[[1, [30, 2, ["name"]]]], [2]], null]],
                    ["@items", "item"],
                    false,
                    []
                ])
            );
        }

        #[test]
        fn should_compile_let() {
            assert_eq!(
                statements(r#"{{#let "a" as |x|}}{{x}}{{/let}}"#),
                json!([[44, ["a"], [[[1, [30, 1]]], [1]]]])
            );
        }

        #[test]
        fn should_compile_yield() {
            assert_eq!(
                compile("{{yield @x}}"),
                json!([[[18, 2, [[30, 1]]]], ["@x", "&default"], false, []])
            );
            assert_eq!(
                compile(r#"{{yield to="inverse"}}"#),
                json!([[[18, 1, null]], ["&else"], false, []])
            );
        }

        #[test]
        fn should_compile_inline_keywords() {
            assert_eq!(statements("{{if @a 1 2.5}}"), json!([[1, [52, [30, 1], 1, 2.5]]]));
            assert_eq!(statements("{{has-block}}"), json!([[1, [48, [30, 1]]]]));
            assert_eq!(statements(r#"{{log "x"}}"#), json!([[1, [54, ["x"]]]]));
        }

        #[test]
        fn should_flag_debugger_as_eval() {
            assert_eq!(
                compile("{{#each @xs as |x|}}{{debugger}}{{/each}}"),
                json!([[[42, [30, 1], null, [[[26, [2]]], [2]], null]], ["@xs", "x"], true, []])
            );
        }
    }

    mod invocations {
        use super::*;

        #[test]
        fn should_compile_components() {
            assert_eq!(
                compile(r#"<Foo @x="1" class="c" ...attributes>hi</Foo>"#),
                json!([
                    [[
                        8,
                        [39, 0],
                        [[24, 0, "c"], [17, 1]],
                        [["@x"], ["1"]],
                        [["default"], [[[[1, "hi"]], []]]]
                    ]],
                    ["&attrs"],
                    false,
                    ["Foo"]
                ])
            );
        }

        #[test]
        fn should_compile_lexical_components_in_strict_mode() {
            let options = PreprocessOptions::strict().with_locals(["Foo"]);
            assert_eq!(
                compile_with("<Foo />", &options),
                json!([[[8, [32, 0], null, null, null]], [], false, ["Foo"]])
            );
        }

        #[test]
        fn should_compile_blocks_with_else() {
            assert_eq!(
                compile("{{#my-list @items as |i|}}{{i}}{{else}}none{{/my-list}}"),
                json!([
                    [[
                        6,
                        [39, 0],
                        [[30, 1]],
                        null,
                        [["default", "else"], [[[[1, [30, 2]]], [2]], [[[1, "none"]], []]]]
                    ]],
                    ["@items", "i"],
                    false,
                    ["my-list"]
                ])
            );
        }
    }

    mod decoding {
        use super::*;

        fn block(text: &str) -> SerializedTemplateBlock {
            match precompile_json(text, &PreprocessOptions::default()) {
                Ok((block, _)) => block,
                Err(error) => panic!("unexpected syntax error:\n{error}"),
            }
        }

        #[test]
        fn should_decode_what_it_encodes() {
            let original = block(
                r#"<div class="a {{b}}" {{on "click" go}}>{{#each @xs key="@index" as |x|}}<Item @x={{x}} ...attributes />{{else}}{{yield (concat "a" x)}}{{/each}}</div>"#,
            );
            let decoded = SerializedTemplateBlock::from_json_str(&original.to_json_string());
            assert_eq!(decoded, Ok(original));
        }

        #[test]
        fn should_keep_null_literals_in_trailing_slots() {
            let original = block(r#"{{if this.c "a" null}}{{if this.c "b"}}"#);
            assert_eq!(
                original.to_json()[0],
                json!([[1, [52, [30, 0, ["c"]], "a", null]], [1, [52, [30, 0, ["c"]], "b"]]])
            );
            let decoded = SerializedTemplateBlock::from_json_str(&original.to_json_string());
            assert_eq!(decoded, Ok(original));
        }

        #[test]
        fn should_treat_a_null_each_key_as_no_key() {
            let original = block("{{#each @xs key=null as |x|}}{{x}}{{/each}}");
            assert_eq!(original.to_json()[0][0][2], json!(null));
            let decoded = SerializedTemplateBlock::from_json_str(&original.to_json_string());
            assert_eq!(decoded, Ok(original));
        }

        #[test]
        fn should_decode_interned_names() {
            let decoded = SerializedTemplateBlock::from_json(&json!([[[10, 2], [14, 6, "/"], [12], [13]], [], false, []]));
            let statements = decoded.map(|block| block.statements);
            assert!(matches!(
                statements.as_deref(),
                Ok([Statement::OpenElement { tag, splat: false }, ..]) if tag == "p"
            ));
        }

        #[test]
        fn should_reject_invalid_json() {
            assert!(matches!(
                SerializedTemplateBlock::from_json_str("[[], [],"),
                Err(WireFormatError::Json(_))
            ));
        }

        #[test]
        fn should_reject_short_blocks() {
            assert!(matches!(
                SerializedTemplateBlock::from_json(&json!([[], [], false])),
                Err(WireFormatError::Expected { expected: "a four element template block", .. })
            ));
        }

        #[test]
        fn should_reject_unknown_opcodes() {
            assert_eq!(
                SerializedTemplateBlock::from_json(&json!([[[98]], [], false, []])),
                Err(WireFormatError::UnknownOpcode(98))
            );
        }

        #[test]
        fn should_reject_symbols_outside_the_tables() {
            assert_eq!(
                SerializedTemplateBlock::from_json(&json!([[[1, [30, 2]]], ["@a"], false, []])),
                Err(WireFormatError::OutOfRange { table: "symbol", index: 2 })
            );
            assert_eq!(
                SerializedTemplateBlock::from_json(&json!([[[1, [36, 0]]], [], false, []])),
                Err(WireFormatError::OutOfRange { table: "upvar", index: 0 })
            );
        }

        #[test]
        fn should_reject_unknown_name_indices() {
            assert_eq!(
                SerializedTemplateBlock::from_json(&json!([[[10, 9]], [], false, []])),
                Err(WireFormatError::UnknownName { kind: "tag", index: 9 })
            );
        }

        #[test]
        fn should_reject_expressions_in_statement_position() {
            assert_eq!(
                SerializedTemplateBlock::from_json(&json!([[[30, 1]], [], false, []])),
                Err(WireFormatError::UnexpectedOpcode {
                    op: Op::GetSymbol,
                    context: "a statement"
                })
            );
        }
    }

    mod debug_format {
        use super::*;

        #[test]
        fn should_name_symbols_and_upvars() {
            assert_eq!(
                debug("{{#each @items as |item|}}{{item}}{{/each}}"),
                json!([[
                    "each",
                    ["get-symbol", "@items", []],
                    null,
                    {
                        "statements": [["append", ["get-symbol", "item", []]]],
                        "parameters": ["item"]
                    },
                    null
                ]])
            );
            assert_eq!(
                debug("{{foo}}"),
                json!([["append", ["ComponentOrHelperOrThisFallback", "foo"]]])
            );
        }

        #[test]
        fn should_render_elements_by_name() {
            assert_eq!(
                debug(r#"<p class="x"></p>"#),
                json!([
                    ["open-element", "p"],
                    ["static-attr", "class", "x", null],
                    ["flush-element"],
                    ["close-element"]
                ])
            );
        }
    }
}
