//! Locating marker-delimited sections in a project file.

use crate::diagnostic::GenError;

/// Half-open line range `[start, end)` inside a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The lines covered by this section.
    pub fn slice<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.start..self.end]
    }
}

/// Finds the block that opens with `start_marker` and closes with `end_marker`,
/// scanning forward from line `from`.
///
/// The start line matches when its trimmed content starts with the marker,
/// and the end line when its trimmed content equals `end_marker`. A start
/// line that already carries the closer (`name = []`, `name = [ a, b ]`) is a
/// one-line section. Blocks holding nested brackets need
/// [`locate_bracket_block`] instead.
pub fn locate_section(
    lines: &[String],
    from: usize,
    start_marker: &str,
    end_marker: &str,
) -> Result<Section, GenError> {
    let not_found = || GenError::section_not_found(start_marker, end_marker);

    let start = find_start(lines, from, start_marker).ok_or_else(not_found)?;

    let rest = lines[start].trim()[start_marker.len()..].trim();
    if rest.ends_with(end_marker) {
        return Ok(Section::new(start, start + 1));
    }

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim() == end_marker)
        .map(|(idx, _)| idx)
        .ok_or_else(not_found)?;

    Ok(Section::new(start, end + 1))
}

/// Finds a JSON-valued block whose `start_marker` ends with its opening
/// bracket, e.g. `menuItems = [`.
///
/// The block ends on the line where bracket depth returns to zero. Brackets
/// inside string literals are ignored, so nested arrays and objects never
/// close it early, however they are indented.
pub fn locate_bracket_block(lines: &[String], from: usize, start_marker: &str) -> Result<Section, GenError> {
    let closer = match start_marker.chars().last() {
        Some('{') => "}",
        _ => "]",
    };
    let not_found = || GenError::section_not_found(start_marker, closer);

    let start = find_start(lines, from, start_marker).ok_or_else(not_found)?;
    let open = lines[start]
        .find(start_marker)
        .map(|pos| pos + start_marker.len() - 1)
        .ok_or_else(not_found)?;

    let mut depth = BracketDepth::default();
    if depth.feed(&lines[start][open..]) {
        return Ok(Section::new(start, start + 1));
    }
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| depth.feed(line))
        .map(|(idx, _)| idx)
        .ok_or_else(not_found)?;

    Ok(Section::new(start, end + 1))
}

fn find_start(lines: &[String], from: usize, start_marker: &str) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| line.trim().starts_with(start_marker))
        .map(|(idx, _)| idx)
}

/// Running `[`/`{` nesting depth across the lines of a JSON block.
#[derive(Debug, Default)]
struct BracketDepth {
    depth: usize,
}

impl BracketDepth {
    /// Consumes one line; returns true once the outermost bracket closes.
    fn feed(&mut self, line: &str) -> bool {
        let mut in_string = false;
        let mut escaped = false;
        for c in line.chars() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '[' | '{' => self.depth += 1,
                ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// Whether `line` is a Python import statement.
pub fn is_import_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("import ") || (line.starts_with("from ") && line.contains(" import "))
}

/// Finds the contiguous run of import statements.
///
/// New import lines go at the end of this section, and named blocks are
/// searched from its start. A file without imports yields an empty section
/// right after its leading comment header.
pub fn locate_import_section(lines: &[String]) -> Section {
    match lines.iter().position(|line| is_import_line(line)) {
        Some(start) => {
            let len = lines[start..]
                .iter()
                .take_while(|line| is_import_line(line))
                .count();
            Section::new(start, start + len)
        }
        None => {
            let header = lines
                .iter()
                .take_while(|line| line.trim_start().starts_with('#'))
                .count();
            Section::new(header, header)
        }
    }
}

/// Replaces the lines of `section` with `replacement`, returning the section
/// now covering the new lines.
pub fn replace_section(lines: &mut Vec<String>, section: Section, replacement: Vec<String>) -> Section {
    let len = replacement.len();
    lines.splice(section.start..section.end, replacement);
    Section::new(section.start, section.start + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_locate_simple_block() {
        let src = lines("import os\n\nlistModules = [\n    a,\n    b\n]\n");
        let section = locate_section(&src, 0, "listModules = [", "]").unwrap();
        assert_eq!(section, Section::new(2, 6));
        assert_eq!(section.slice(&src).last().unwrap(), "]");
    }

    #[test]
    fn test_indented_closer_ends_flat_block() {
        let src = lines("listModules = [\n    app.a\n    ]\n\nmenuItems = [\n    {\n        \"displayName\": \"Home\"\n    }\n]");
        let section = locate_section(&src, 0, "listModules = [", "]").unwrap();
        assert_eq!(section, Section::new(0, 3));
    }

    #[test]
    fn test_collapsed_flat_block_with_entries() {
        let src = lines("listModules = [ app.a, app.b ]\nmenuItems = [\n]");
        let section = locate_section(&src, 0, "listModules = [", "]").unwrap();
        assert_eq!(section, Section::new(0, 1));
    }

    #[test]
    fn test_nested_closers_do_not_end_bracket_block() {
        let src = lines("menuItems = [\n    {\n        \"childeren\": [\n        ]\n    }\n]\nother = [\n]");
        let section = locate_bracket_block(&src, 0, "menuItems = [").unwrap();
        assert_eq!(section, Section::new(0, 6));
    }

    #[test]
    fn test_bracket_block_indented_closer_and_strings() {
        let src = lines("menuItems = [\n    {\"displayName\": \"a ] b\", \"route\": \"/x\\\"]\"}\n    ]\nlater = [\n]");
        let section = locate_bracket_block(&src, 0, "menuItems = [").unwrap();
        assert_eq!(section, Section::new(0, 3));
    }

    #[test]
    fn test_bracket_block_on_one_line() {
        let src = lines("import os\nmenuItems = [ {\"displayName\": \"Home\"} ]\nfoo = 1");
        let section = locate_bracket_block(&src, 0, "menuItems = [").unwrap();
        assert_eq!(section, Section::new(1, 2));
    }

    #[test]
    fn test_unclosed_bracket_block() {
        let src = lines("menuItems = [\n    {\n]");
        assert!(matches!(
            locate_bracket_block(&src, 0, "menuItems = ["),
            Err(GenError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn test_search_starts_at_offset() {
        let src = lines("listModules = [\n]\nlistModules = [\n    x\n]");
        let section = locate_section(&src, 1, "listModules = [", "]").unwrap();
        assert_eq!(section, Section::new(2, 5));
    }

    #[test]
    fn test_collapsed_block() {
        let src = lines("import os\nmenuItems = []\nfoo = 1");
        let section = locate_section(&src, 0, "menuItems = [", "]").unwrap();
        assert_eq!(section, Section::new(1, 2));
    }

    #[test]
    fn test_missing_markers() {
        let src = lines("import os\nlistModules = [\n    a,\n");
        assert!(matches!(
            locate_section(&src, 0, "listModules = [", "]"),
            Err(GenError::SectionNotFound { .. })
        ));
        assert!(matches!(
            locate_section(&src, 0, "menuItems = [", "]"),
            Err(GenError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn test_import_section() {
        let src = lines("# header\nimport logging\nfrom flask import Blueprint\n\nimport late\n");
        assert_eq!(locate_import_section(&src), Section::new(1, 3));
    }

    #[test]
    fn test_import_section_without_imports() {
        let src = lines("# header\n# more\nx = 1\n");
        assert_eq!(locate_import_section(&src), Section::new(2, 2));
    }

    #[test]
    fn test_replace_section() {
        let mut src = lines("a\nb\nc\nd");
        let section = replace_section(&mut src, Section::new(1, 3), vec!["x".into(), "y".into(), "z".into()]);
        assert_eq!(src, ["a", "x", "y", "z", "d"]);
        assert_eq!(section, Section::new(1, 4));
    }
}
