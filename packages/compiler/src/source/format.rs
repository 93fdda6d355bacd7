use super::{Source, SourceSpan};

/// Renders `message` with a code frame for `span`:
///
/// ```text
/// Unclosed element `div`:
///
/// |
/// |  <div>
/// |
///
/// (error occurred in 'my-module' @ line 1 : column 0)
/// ```
pub fn format_error(source: &Source, span: SourceSpan, message: &str) -> String {
    let location = source.location_for(span);
    let mut out = String::from(message);

    if source.has_text() {
        out.push_str(":\n\n|\n");
        for line in location.start.line..=location.end.line {
            if let Some(text) = source.line(line) {
                out.push_str("|  ");
                out.push_str(text);
                out.push('\n');
            }
        }
        out.push_str("|\n\n");
    } else {
        out.push(' ');
    }

    out.push_str(&format!(
        "(error occurred in '{}' @ line {} : column {})",
        source.module(),
        location.start.line,
        location.start.column
    ));
    out
}
