/**
 * Printer tests
 *
 * Templates parsed in codemod mode print back to their source; built ASTs
 * print as the template that would produce them.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{parse, parse_codemod};
    use glimmer_compiler::b;
    use glimmer_compiler::v1::{print, AttrValue, EntityEncoding, PrinterOptions, Statement};

    fn round_trip(text: &str) {
        let printed = print(&parse_codemod(text), PrinterOptions::default());
        assert_eq!(printed, text);
    }

    mod round_trips {
        use super::*;

        #[test]
        fn should_print_elements_and_attributes() {
            round_trip(r#"<div class="a {{b}} c" id={{d}} disabled>text</div>"#);
            round_trip("<input disabled><br />");
        }

        #[test]
        fn should_print_mustaches() {
            round_trip(r#"{{foo (bar 1 true null) "s" key=@value}}"#);
            round_trip("{{{raw}}}");
            round_trip("{{~trimmed~}}");
        }

        #[test]
        fn should_print_blocks() {
            round_trip("{{#if a}}A{{else if b}}B{{else}}C{{/if}}");
            round_trip(r#"{{#each items key="@index" as |item i|}}{{item}}{{/each}}"#);
        }

        #[test]
        fn should_print_comments() {
            round_trip("<!-- html -->{{! short }}{{!-- long --}}");
        }

        #[test]
        fn should_print_components() {
            round_trip("<Foo @title={{t}} {{on \"click\" go}} as |x|>{{x}}</Foo>");
            round_trip("<Foo ...attributes />");
        }

        #[test]
        fn should_keep_entities_written_in_codemod_mode() {
            round_trip("<p>a &amp; b &nbsp;</p>");
        }
    }

    mod entity_encoding {
        use super::*;

        #[test]
        fn should_reencode_decoded_text() {
            let template = parse(r#"<p title="say &quot;hi&quot;">a &amp; b &lt;c&gt;</p>"#);
            let printed = print(
                &template,
                PrinterOptions {
                    entity_encoding: EntityEncoding::Transformed,
                },
            );
            assert_eq!(printed, r#"<p title="say &quot;hi&quot;">a &amp; b &lt;c&gt;</p>"#);
        }

        #[test]
        fn should_print_decoded_text_raw_by_default() {
            let printed = print(&parse("<p>a &amp; b</p>"), PrinterOptions::default());
            assert_eq!(printed, "<p>a & b</p>");
        }
    }

    mod builders {
        use super::*;

        #[test]
        fn should_print_built_nodes() {
            let element = b::element("div")
                .attr(b::static_attr("class", "box"))
                .attr(b::attr("title", AttrValue::Mustache(b::mustache(b::path("@title")))))
                .children(vec![
                    Statement::Mustache(b::call_mustache(
                        b::path("format"),
                        vec![b::path("this.value"), b::number(2.0)],
                        b::hash(vec![b::pair("short", b::boolean(true))]),
                    )),
                    Statement::Text(b::text("!")),
                ])
                .build();
            let template = b::template(vec![Statement::Element(element)]);
            assert_eq!(
                print(&template, PrinterOptions::default()),
                r#"<div class="box" title={{@title}}>{{format this.value 2 short=true}}!</div>"#
            );
        }

        #[test]
        fn should_print_built_blocks() {
            let block = b::block(
                b::path("each"),
                vec![b::path("items")],
                b::hash(Vec::new()),
                b::block_itself(vec![Statement::Mustache(b::mustache(b::path("item")))], vec!["item"]),
                Some(b::block_itself(vec![Statement::Text(b::text("none"))], Vec::new())),
            );
            let template = b::template(vec![Statement::Block(block)]);
            assert_eq!(
                print(&template, PrinterOptions::default()),
                "{{#each items as |item|}}{{item}}{{else}}none{{/each}}"
            );
        }
    }
}
