/**
 * Parser tests
 *
 * Source text to AST v1: elements, mustaches, blocks, attributes, comments,
 * whitespace control and scope marking.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize, parse, parse_codemod};
    use glimmer_compiler::v1::{AttrValue, Expression, PathHead, Statement};
    use glimmer_compiler::{preprocess, PreprocessOptions, SourceSpan};

    fn rows(text: &str) -> Vec<Vec<String>> {
        humanize(&parse(text))
    }

    fn r(kind: &str, detail: &str, depth: usize) -> Vec<String> {
        vec![kind.to_string(), detail.to_string(), depth.to_string()]
    }

    mod content {
        use super::*;

        #[test]
        fn should_parse_text_and_mustaches() {
            assert_eq!(
                rows("Hello {{name}}!"),
                vec![r("Text", "Hello ", 0), r("Mustache", "name", 0), r("Text", "!", 0)]
            );
        }

        #[test]
        fn should_parse_nested_elements() {
            assert_eq!(
                rows("<div><p>{{foo}}</p></div>"),
                vec![r("Element", "div", 0), r("Element", "p", 1), r("Mustache", "foo", 2)]
            );
        }

        #[test]
        fn should_parse_void_and_self_closing_elements() {
            let template = parse("<input><br/><Foo />");
            let tags: Vec<(&str, bool)> = template
                .body
                .iter()
                .map(|statement| match statement {
                    Statement::Element(element) => (element.tag.as_str(), element.self_closing),
                    other => panic!("unexpected {}", other.kind()),
                })
                .collect();
            assert_eq!(tags, vec![("input", false), ("br", true), ("Foo", true)]);
        }

        #[test]
        fn should_parse_html_and_mustache_comments() {
            assert_eq!(
                rows("<!-- html -->{{! short }}{{!-- long --}}"),
                vec![
                    r("Comment", " html ", 0),
                    r("MustacheComment", " short ", 0),
                    r("MustacheComment", " long ", 0),
                ]
            );
        }

        #[test]
        fn should_keep_mustaches_inside_html_comments_as_text() {
            assert_eq!(rows("<!-- {{foo}} -->"), vec![r("Comment", " {{foo}} ", 0)]);
        }

        #[test]
        fn should_parse_trusting_mustaches() {
            let template = parse("{{{html}}}{{&also}}");
            let trusting: Vec<bool> = template
                .body
                .iter()
                .map(|statement| match statement {
                    Statement::Mustache(mustache) => mustache.trusting,
                    other => panic!("unexpected {}", other.kind()),
                })
                .collect();
            assert_eq!(trusting, vec![true, true]);
        }
    }

    mod entities {
        use super::*;

        #[test]
        fn should_decode_character_references_when_precompiling() {
            assert_eq!(rows("<p>&amp;&lt;&#65;</p>"), vec![r("Element", "p", 0), r("Text", "&<A", 1)]);
        }

        #[test]
        fn should_keep_character_references_in_codemod_mode() {
            assert_eq!(
                humanize(&parse_codemod("<p>&amp;</p>")),
                vec![r("Element", "p", 0), r("Text", "&amp;", 1)]
            );
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_parse_static_dynamic_and_concat_values() {
            assert_eq!(
                rows(r#"<div class="a {{b}} c" id={{x}} title="plain" hidden></div>"#),
                vec![
                    r("Element", "div", 0),
                    r("Attr", r#"class=concat("a " {{b}} " c")"#, 1),
                    r("Attr", "id={{x}}", 1),
                    r("Attr", r#"title="plain""#, 1),
                    r("Attr", r#"hidden="""#, 1),
                ]
            );
        }

        #[test]
        fn should_parse_modifiers() {
            assert_eq!(
                rows(r#"<button {{on "click" this.save}}>Save</button>"#),
                vec![
                    r("Element", "button", 0),
                    r("Modifier", "on", 1),
                    r("Text", "Save", 1),
                ]
            );
        }

        #[test]
        fn should_parse_arguments_and_splattributes_on_components() {
            assert_eq!(
                rows("<Foo @title={{t}} ...attributes />"),
                vec![
                    r("Element", "Foo", 0),
                    r("Attr", "@title={{t}}", 1),
                    r("Attr", r#"...attributes="""#, 1),
                ]
            );
        }

        #[test]
        fn should_keep_mustache_comments_in_start_tags() {
            let template = parse("<div {{! note }} class=\"x\"></div>");
            let Statement::Element(element) = &template.body[0] else {
                panic!("expected an element");
            };
            assert_eq!(element.comments.len(), 1);
            assert_eq!(element.comments[0].value, " note ");
            assert_eq!(element.attributes.len(), 1);
        }
    }

    mod blocks {
        use super::*;

        #[test]
        fn should_parse_blocks_with_inverse() {
            assert_eq!(
                rows("{{#if cond}}yes{{else}}no{{/if}}"),
                vec![
                    r("Block", "if", 0),
                    r("Text", "yes", 1),
                    r("Else", "", 0),
                    r("Text", "no", 1),
                ]
            );
        }

        #[test]
        fn should_chain_else_if() {
            let template = parse("{{#if a}}A{{else if b}}B{{else}}C{{/if}}");
            let Statement::Block(outer) = &template.body[0] else {
                panic!("expected a block");
            };
            let inverse = outer.inverse.as_ref().expect("inverse");
            assert!(inverse.chained);
            let Some(Statement::Block(inner)) = inverse.body.first() else {
                panic!("expected a chained block");
            };
            assert!(inner.inverse.is_some());
        }

        #[test]
        fn should_mark_block_params_as_locals() {
            let template = parse("{{#each items as |item|}}{{item}}{{other}}{{/each}}{{item}}");
            let Statement::Block(block) = &template.body[0] else {
                panic!("expected a block");
            };
            assert_eq!(block.program.params.len(), 1);
            assert_eq!(block.program.params[0].name, "item");

            let local = |statement: &Statement| match statement {
                Statement::Mustache(mustache) => match &mustache.path {
                    Expression::Path(path) => match &path.head {
                        PathHead::Var(head) => head.local,
                        _ => panic!("expected a variable"),
                    },
                    _ => panic!("expected a path"),
                },
                other => panic!("unexpected {}", other.kind()),
            };
            assert!(local(&block.program.body[0]));
            assert!(!local(&block.program.body[1]));
            assert!(!local(&template.body[1]));
        }

        #[test]
        fn should_parse_element_block_params() {
            let template = parse("<Foo as |bar baz|>{{bar}}</Foo>");
            let Statement::Element(element) = &template.body[0] else {
                panic!("expected an element");
            };
            let names: Vec<&str> = element.block_params.iter().map(|param| param.name.as_str()).collect();
            assert_eq!(names, vec!["bar", "baz"]);
            assert!(element.attributes.is_empty());
        }

        #[test]
        fn should_parse_inverted_sections() {
            assert_eq!(
                rows("{{^if cond}}no{{/if}}"),
                vec![r("Block", "if", 0), r("Else", "", 0), r("Text", "no", 1)]
            );
        }
    }

    mod expressions {
        use super::*;

        #[test]
        fn should_parse_params_hash_and_sub_expressions() {
            let template = parse(r#"{{format-date (now) "short" utc=true count=2}}"#);
            let Statement::Mustache(mustache) = &template.body[0] else {
                panic!("expected a mustache");
            };
            assert_eq!(mustache.params.len(), 2);
            assert!(matches!(mustache.params[0], Expression::SubExpression(_)));
            let keys: Vec<&str> = mustache.hash.pairs.iter().map(|pair| pair.key.as_str()).collect();
            assert_eq!(keys, vec!["utc", "count"]);
        }

        #[test]
        fn should_parse_this_and_argument_paths() {
            let template = parse("{{this.name}}{{@user.name}}");
            let heads: Vec<String> = template
                .body
                .iter()
                .map(|statement| match statement {
                    Statement::Mustache(mustache) => super::super::utils::humanize_expr(&mustache.path),
                    other => panic!("unexpected {}", other.kind()),
                })
                .collect();
            assert_eq!(heads, vec!["this.name".to_string(), "@user.name".to_string()]);
        }
    }

    mod whitespace {
        use super::*;

        #[test]
        fn should_strip_around_tildes() {
            assert_eq!(
                rows("a  {{~foo~}}  b"),
                vec![r("Text", "a", 0), r("Mustache", "foo", 0), r("Text", "b", 0)]
            );
        }

        #[test]
        fn should_strip_standalone_else_lines() {
            assert_eq!(
                rows("{{#if a}}\nyes\n{{else}}\nno\n{{/if}}"),
                vec![r("Block", "if", 0), r("Text", "yes\n", 1), r("Else", "", 0), r("Text", "no\n", 1)]
            );
        }

        #[test]
        fn should_strip_standalone_else_if_chains() {
            assert_eq!(
                rows("{{#if a}}\nA\n{{else if b}}\nB\n{{else}}\nC\n{{/if}}"),
                vec![
                    r("Block", "if", 0),
                    r("Text", "A\n", 1),
                    r("Else", "", 0),
                    r("Block", "if", 1),
                    r("Text", "B\n", 2),
                    r("Else", "", 1),
                    r("Text", "C\n", 2),
                ]
            );
        }

        #[test]
        fn should_leave_whitespace_alone_in_codemod_mode() {
            assert_eq!(
                humanize(&parse_codemod("a  {{~foo~}}  b")),
                vec![r("Text", "a  ", 0), r("Mustache", "foo", 0), r("Text", "  b", 0)]
            );
        }
    }

    mod locations {
        use super::*;

        #[test]
        fn should_locate_elements_and_text() {
            let template = parse("<p>hi</p>");
            let Statement::Element(element) = &template.body[0] else {
                panic!("expected an element");
            };
            assert_eq!(element.loc, SourceSpan::new(0, 9));
            assert_eq!(element.start_tag, SourceSpan::new(0, 3));
            assert_eq!(element.children[0].loc(), SourceSpan::new(3, 5));
        }

        #[test]
        fn should_span_the_whole_template() {
            let template = parse("{{a}} {{b}}");
            assert_eq!(template.loc, SourceSpan::new(0, 11));
        }
    }

    mod embedder_locals {
        use super::*;

        #[test]
        fn should_mark_embedder_locals_and_record_them_on_the_template() {
            let options = PreprocessOptions::strict().with_locals(["Greeting"]);
            let template = preprocess("<Greeting />{{Greeting}}", &options).unwrap();
            assert_eq!(template.block_params, vec!["Greeting".to_string()]);
            let Statement::Mustache(mustache) = &template.body[1] else {
                panic!("expected a mustache");
            };
            let Expression::Path(path) = &mustache.path else {
                panic!("expected a path");
            };
            assert!(matches!(&path.head, PathHead::Var(head) if head.local));
        }

        #[test]
        fn should_keep_static_attribute_values() {
            let template = parse(r#"<img alt="a &amp; b">"#);
            let Statement::Element(element) = &template.body[0] else {
                panic!("expected an element");
            };
            assert!(matches!(&element.attributes[0].value, AttrValue::Text(text) if text.chars == "a & b"));
        }
    }
}
