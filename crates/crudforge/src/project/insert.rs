//! Idempotent line insertion.

use tracing::debug;

use super::section::Section;

/// Strips the trailing separators and whitespace a list entry may carry.
pub fn normalize_entry(line: &str) -> &str {
    line.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

/// Splits a line at its `#` comment, returning the code and the comment.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find('#') {
        Some(pos) => (&line[..pos], Some(line[pos..].trim_end())),
        None => (line, None),
    }
}

/// The part of a line that decides equivalence: its code without the
/// trailing comment, or the whole line when it is only a comment.
fn comparable(line: &str) -> &str {
    let (code, _) = split_comment(line);
    if code.trim().is_empty() {
        normalize_entry(line)
    } else {
        normalize_entry(code)
    }
}

/// Inserts `new_line` at the end of `section` unless an equivalent line is
/// already inside it.
///
/// Lines are equivalent when their code matches; trailing separators and
/// comments are ignored, so an import carrying a different marker comment
/// is not added twice. On insertion `section` grows by one line, so later
/// calls in the same batch must reuse it. Returns whether a line was added.
pub fn insert_unique(lines: &mut Vec<String>, section: &mut Section, new_line: &str) -> bool {
    let wanted = comparable(new_line);
    if section
        .slice(lines)
        .iter()
        .any(|line| comparable(line) == wanted)
    {
        debug!(line = %wanted, "line already present");
        return false;
    }

    lines.insert(section.end, new_line.to_string());
    section.end += 1;
    debug!(line = %wanted, at = section.end - 1, "line inserted");
    true
}
