//! Line/column resolution and caret-annotated source snippets.

use tessera_core::Span;

/// 1-based line and column of a byte offset. Columns count characters, not
/// bytes, so they line up with what an editor shows.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = source[line_start..offset].chars().count() + 1;
    (line, column)
}

struct Line {
    number: usize,
    /// Byte range of the line's content, excluding the line break.
    start: usize,
    end: usize,
    /// First offset past the line break; past the end of input for the last
    /// line, so the end-of-input offset counts as covered.
    next: usize,
}

fn split_lines(source: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;
    loop {
        match source[start..].find('\n') {
            Some(i) => {
                let mut end = start + i;
                if end > start && source.as_bytes()[end - 1] == b'\r' {
                    end -= 1;
                }
                lines.push(Line {
                    number,
                    start,
                    end,
                    next: start + i + 1,
                });
                start += i + 1;
                number += 1;
            }
            None => {
                lines.push(Line {
                    number,
                    start,
                    end: source.len(),
                    next: source.len() + 1,
                });
                break;
            }
        }
    }
    lines
}

/// Renders a message with location plus each covered source line and a
/// caret run under the spanned columns:
///
/// ```text
/// <message> at [<line>:<column>]
/// <n> | <source line>
///     | <leading-space><carets>
/// ```
///
/// Zero-width spans render a single caret; multi-line spans print one caret
/// run per covered line. The caret gutter matches the line-number gutter so
/// carets align with source columns.
pub(crate) fn render_snippet(source: &str, span: Span, message: &str) -> String {
    let (line, column) = line_col(source, span.start);
    let start = span.start.min(source.len());
    let end = span.end.max(span.start + 1);

    let lines = split_lines(source);
    let covered: Vec<&Line> = lines
        .iter()
        .filter(|l| start < l.next && end > l.start)
        .collect();
    let gutter = covered.last().map_or(1, |l| l.number.to_string().len());

    let mut out = format!("{message} at [{line}:{column}]");
    for info in covered {
        let text = &source[info.start..info.end];
        let caret_from = start.clamp(info.start, info.end);
        let caret_to = end.clamp(caret_from, info.end);
        let lead = source[info.start..caret_from].chars().count();
        let width = source[caret_from..caret_to].chars().count().max(1);

        out.push('\n');
        out.push_str(&format!("{:>gutter$} | {}", info.number, text));
        out.push('\n');
        out.push_str(&format!(
            "{:>gutter$} | {}{}",
            "",
            " ".repeat(lead),
            "^".repeat(width)
        ));
    }
    out
}
