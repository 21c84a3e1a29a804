//! The `listModules = [...]` registry block.

use tracing::debug;

use crate::diagnostic::GenError;
use super::insert::{normalize_entry, split_comment};
use super::section::{locate_section, replace_section};

pub const LABEL_LIST_MODULES: &str = "listModules = [";
pub const LABEL_END_LIST: &str = "]";

/// One line of the registry block: a module, a comment, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListEntry {
    Module { name: String, comment: Option<String> },
    Comment(String),
}

/// Reads the entries currently listed in the module block.
pub fn read_module_list(lines: &[String], from: usize) -> Result<Vec<String>, GenError> {
    let section = locate_section(lines, from, LABEL_LIST_MODULES, LABEL_END_LIST)?;
    Ok(module_names(&entries(section.slice(lines))))
}

/// Parses the block, including entries sharing a line with the opening
/// marker or the closer (`listModules = [ a, b ]`).
fn entries(block: &[String]) -> Vec<ListEntry> {
    let last = block.len().saturating_sub(1);
    let mut out = Vec::new();

    for (idx, line) in block.iter().enumerate() {
        let mut text = line.trim();
        if idx == 0 {
            text = &text[LABEL_LIST_MODULES.len().min(text.len())..];
        }
        let (code, comment) = split_comment(text);
        let code = if idx == last {
            code.trim_end().strip_suffix(LABEL_END_LIST).unwrap_or(code)
        } else {
            code
        };

        let mut names: Vec<String> = code
            .split(',')
            .map(|name| normalize_entry(name.trim()).to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let comment = comment.map(String::from);

        match names.pop() {
            Some(tail) => {
                out.extend(names.into_iter().map(|name| ListEntry::Module { name, comment: None }));
                out.push(ListEntry::Module { name: tail, comment });
            }
            None => out.extend(comment.map(ListEntry::Comment)),
        }
    }
    out
}

fn module_names(entries: &[ListEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            ListEntry::Module { name, .. } => Some(name.clone()),
            ListEntry::Comment(_) => None,
        })
        .collect()
}

/// Rewrites the module block as the union of its entries and `new_modules`.
///
/// Existing entries keep their order and trailing comments, including ones
/// added by hand; new names are appended in the order given. Returns the
/// final list.
pub fn rewrite_module_list(
    lines: &mut Vec<String>,
    from: usize,
    new_modules: &[String],
) -> Result<Vec<String>, GenError> {
    let section = locate_section(lines, from, LABEL_LIST_MODULES, LABEL_END_LIST)?;
    let mut entries = entries(section.slice(lines));
    let mut modules = module_names(&entries);

    for module in new_modules {
        if !modules.contains(module) {
            debug!(module = %module, "registering module");
            modules.push(module.clone());
            entries.push(ListEntry::Module {
                name: module.clone(),
                comment: None,
            });
        }
    }

    replace_section(lines, section, render_module_list(&entries));
    Ok(modules)
}

/// One entry per line, comma-terminated except the last module. The comma
/// goes before any trailing comment.
fn render_module_list(entries: &[ListEntry]) -> Vec<String> {
    let last_module = entries
        .iter()
        .rposition(|entry| matches!(entry, ListEntry::Module { .. }));

    let mut block = Vec::with_capacity(entries.len() + 2);
    block.push(LABEL_LIST_MODULES.to_string());
    for (idx, entry) in entries.iter().enumerate() {
        match entry {
            ListEntry::Module { name, comment } => {
                let sep = if Some(idx) == last_module { "" } else { "," };
                match comment {
                    Some(comment) => block.push(format!("    {}{}  {}", name, sep, comment)),
                    None => block.push(format!("    {}{}", name, sep)),
                }
            }
            ListEntry::Comment(comment) => block.push(format!("    {}", comment)),
        }
    }
    block.push(LABEL_END_LIST.to_string());
    block
}
