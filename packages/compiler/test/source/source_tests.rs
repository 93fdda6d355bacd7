/**
 * Source and span tests
 *
 * Offsets, line/column conversion and error frames.
 */

#[cfg(test)]
mod tests {
    use glimmer_compiler::source::{
        format_error, Source, SourceLocation, SourceOffset, SourcePosition, SourceSpan, UNKNOWN_MODULE,
    };

    mod positions {
        use super::*;

        #[test]
        fn should_round_trip_offsets_through_line_and_column() {
            let source = Source::new("<div>\n  {{foo}}\n</div>", "m");
            for offset in 0..=source.len() {
                let position = source.position_for(offset).unwrap();
                assert_eq!(
                    source.offset_for(position.line, position.column),
                    Some(SourceOffset(offset)),
                    "offset {offset}"
                );
            }
        }

        #[test]
        fn should_reject_positions_past_the_end_of_a_line() {
            let source = Source::new("ab\ncd", "m");
            assert_eq!(source.offset_for(1, 2), Some(SourceOffset(2)));
            assert_eq!(source.offset_for(1, 3), None);
            assert_eq!(source.offset_for(3, 0), None);
            assert_eq!(source.offset_for(0, 0), None);
        }

        #[test]
        fn should_convert_spans_to_locations_and_back() {
            let source = Source::new("one\ntwo three", "m");
            let span = SourceSpan::new(8, 13);
            let location = source.location_for(span);
            assert_eq!(
                location,
                SourceLocation {
                    start: SourcePosition::new(2, 4),
                    end: SourcePosition::new(2, 9),
                }
            );
            assert_eq!(source.span_for(location), Some(span));
            assert_eq!(span.slice(&source), "three");
        }

        #[test]
        fn should_slice_only_on_char_boundaries() {
            let source = Source::new("é!", "m");
            assert_eq!(source.slice(0, 2), Some("é"));
            assert_eq!(source.slice(0, 1), None);
            assert!(!source.check(1));
            assert!(source.check(3));
        }
    }

    mod spans {
        use super::*;

        #[test]
        fn should_build_spans_from_offsets() {
            let span = SourceOffset(3).until(SourceOffset(9));
            assert_eq!(span, SourceSpan::new(3, 9));
            assert_eq!(span.with_start(5), SourceSpan::new(5, 9));
            assert_eq!(span.with_end(4), SourceSpan::new(3, 4));
            assert_eq!(span.collapse_end(), SourceSpan::new(9, 9));
            assert!(span.collapse_start().is_empty());
        }
    }

    mod modules {
        use super::*;

        #[test]
        fn should_default_the_module_name() {
            assert_eq!(UNKNOWN_MODULE, "an unknown module");
            assert_eq!(Source::synthetic("").module(), UNKNOWN_MODULE);
            assert!(!Source::synthetic("x").has_text());
        }
    }

    mod error_frames {
        use super::*;

        #[test]
        fn should_quote_every_line_the_span_covers() {
            let source = Source::new("<div>\n<p>\n</div>", "app/components/x");
            let message = format_error(&source, SourceSpan::new(6, 9), "Unclosed element `p`");
            assert_eq!(
                message,
                "Unclosed element `p`:\n\n|\n|  <p>\n|\n\n(error occurred in 'app/components/x' @ line 2 : column 0)"
            );
        }

        #[test]
        fn should_skip_the_frame_without_source_text() {
            let source = Source::synthetic("built");
            let message = format_error(&source, SourceSpan::synthetic(), "Oops");
            assert_eq!(message, "Oops (error occurred in 'built' @ line 1 : column 0)");
        }
    }
}
