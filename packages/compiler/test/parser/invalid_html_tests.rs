/**
 * Invalid HTML tests
 *
 * Unbalanced, unclosed and malformed elements, attributes and block params.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{error_code, parse_error};
    use glimmer_compiler::SourceSpan;
    use serde_json::json;

    mod elements {
        use super::*;

        #[test]
        fn should_reject_an_unclosed_element() {
            assert_eq!(
                error_code("<div><p></p>"),
                ("elements.unclosed-element", Some(json!("div")))
            );
        }

        #[test]
        fn should_reject_an_unclosed_element_inside_a_block() {
            assert_eq!(
                error_code("{{#if a}}<span>{{/if}}"),
                ("elements.unclosed-element", Some(json!("span")))
            );
        }

        #[test]
        fn should_reject_a_tag_left_open_at_the_end() {
            assert_eq!(error_code("<div class=\"x\""), ("elements.unclosed-element", Some(json!("div"))));
        }

        #[test]
        fn should_reject_an_end_tag_without_a_start_tag() {
            assert_eq!(
                error_code("</p>"),
                ("elements.end-without-start-tag", Some(json!("p")))
            );
        }

        #[test]
        fn should_reject_unbalanced_tags() {
            assert_eq!(
                error_code("<div></span>"),
                (
                    "elements.unbalanced-tags",
                    Some(json!({ "open": "div", "close": "span" }))
                )
            );
        }

        #[test]
        fn should_reject_end_tags_on_void_elements() {
            assert_eq!(
                error_code("<input></input>"),
                ("elements.unnecessary-end-tag", Some(json!("input")))
            );
        }

        #[test]
        fn should_reject_attributes_in_end_tags() {
            assert_eq!(error_code("<div></div foo>").0, "elements.invalid-attrs-in-end-tag");
            assert_eq!(error_code("<div></div {{foo}}>").0, "elements.invalid-attrs-in-end-tag");
        }

        #[test]
        fn should_reject_an_unclosed_html_comment() {
            assert_eq!(error_code("<!-- oops").0, "hbs.syntax.parse-error");
        }

        #[test]
        fn should_point_at_the_offending_end_tag() {
            let error = parse_error("<div></span>");
            assert_eq!(error.span, SourceSpan::new(5, 12));
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_reject_an_equals_sign_starting_an_attribute() {
            assert_eq!(
                error_code("<div =foo></div>"),
                ("attrs.invalid-char", Some(json!("=")))
            );
        }
    }

    mod block_params {
        use super::*;

        #[test]
        fn should_reject_empty_block_params() {
            assert_eq!(error_code("<Foo as ||></Foo>").0, "block-params.empty");
        }

        #[test]
        fn should_reject_unclosed_block_params() {
            assert_eq!(error_code("<Foo as |a></Foo>").0, "block-params.unclosed");
        }

        #[test]
        fn should_reject_block_params_without_as() {
            assert_eq!(error_code("<Foo |a|></Foo>").0, "block-params.missing-as");
        }

        #[test]
        fn should_reject_as_without_a_pipe() {
            assert_eq!(error_code("<Foo as a></Foo>").0, "block-params.missing-pipe");
        }

        #[test]
        fn should_reject_attributes_after_block_params() {
            assert_eq!(error_code("<Foo as |a| class=\"x\"></Foo>").0, "block-params.extra-attrs");
            assert_eq!(error_code("<Foo as |a| b></Foo>").0, "block-params.extra-attrs");
        }

        #[test]
        fn should_reject_invalid_identifiers() {
            assert_eq!(
                error_code("<Foo as |a.b|></Foo>"),
                ("block-params.invalid-id", Some(json!("a.b")))
            );
        }
    }
}
