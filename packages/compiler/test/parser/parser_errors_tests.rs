/**
 * Parser error tests
 *
 * Handlebars level failures: malformed paths, unsupported syntax and
 * mustaches in places the HTML tokenizer cannot accept them.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{error_code, parse_error};
    use glimmer_compiler::source::SourcePosition;
    use serde_json::json;

    mod paths {
        use super::*;

        #[test]
        fn should_reject_parent_context_lookups() {
            assert_eq!(error_code("{{../foo}}").0, "hbs.syntax.invalid-dotdot");
        }

        #[test]
        fn should_reject_dot_slash() {
            assert_eq!(error_code("{{./foo}}").0, "hbs.syntax.invalid-dotslash");
        }

        #[test]
        fn should_reject_mixed_separators() {
            assert_eq!(error_code("{{foo/bar.baz}}").0, "hbs.syntax.invalid-slash");
        }
    }

    mod unsupported {
        use super::*;

        #[test]
        fn should_reject_partial_blocks() {
            assert_eq!(error_code("{{#> layout}}x{{/layout}}").0, "hbs.syntax.partial-unsupported");
        }

        #[test]
        fn should_reject_decorators() {
            assert_eq!(error_code("{{* decorate}}").0, "hbs.syntax.decorator-unsupported");
            assert_eq!(error_code("{{#* inline}}x{{/inline}}").0, "hbs.syntax.decorator-unsupported");
        }
    }

    mod blocks {
        use super::*;

        #[test]
        fn should_reject_mismatched_close_tags() {
            assert_eq!(
                error_code("{{#if a}}x{{/each}}"),
                (
                    "hbs.syntax.mismatched-block",
                    Some(json!({ "open": "if", "close": "each" }))
                )
            );
        }

        #[test]
        fn should_reject_a_close_without_an_open_block() {
            assert_eq!(error_code("x{{/if}}").0, "hbs.syntax.parse-error");
            assert_eq!(error_code("x{{else}}y").0, "hbs.syntax.parse-error");
        }

        #[test]
        fn should_reject_blocks_inside_tags() {
            assert_eq!(error_code("<div {{#if a}}{{/if}}></div>").0, "hbs.syntax.block-in-tag");
        }
    }

    mod mustaches_in_tags {
        use super::*;

        #[test]
        fn should_reject_mustaches_in_tag_names() {
            assert_eq!(error_code("<{{tag}}></div>").0, "elements.mustache-in-tag-name");
            assert_eq!(error_code("<div{{foo}}></div>").0, "elements.mustache-in-tag-name");
        }

        #[test]
        fn should_reject_comments_in_attribute_values() {
            assert_eq!(
                error_code("<div class={{! nope }}></div>"),
                ("hbs.syntax.comment-in-tag", Some(json!("beforeAttributeValue")))
            );
        }

        #[test]
        fn should_reject_literal_modifiers() {
            assert_eq!(error_code(r#"<div {{"nope"}}></div>"#).0, "hbs.syntax.parse-error");
        }

        #[test]
        fn should_reject_unquoted_values_mixing_text_and_mustaches() {
            assert_eq!(error_code("<div class=a{{b}}></div>").0, "attrs.invalid-attr-value");
        }
    }

    mod reporting {
        use super::*;

        #[test]
        fn should_locate_the_error() {
            let error = parse_error("<div>\n  {{#if a}}x{{/each}}\n</div>");
            assert_eq!(error.location.start, SourcePosition::new(2, 12));
            assert_eq!(error.module, "an unknown module");
        }

        #[test]
        fn should_render_a_code_frame() {
            let error = parse_error("{{../foo}}");
            let message = error.to_string();
            assert!(message.starts_with("Changing context using \"../\" is not supported in Glimmer"));
            assert!(message.contains("|  {{../foo}}"));
            assert!(message.ends_with("(error occurred in 'an unknown module' @ line 1 : column 2)"));
        }
    }
}
