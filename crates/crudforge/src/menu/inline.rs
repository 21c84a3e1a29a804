//! Menu tree stored inline in the project file (schema version 1).
//!
//! The block looks like:
//!
//! ```text
//! menuItems = [
//!     {
//!         "displayName": "Admin",
//!         "index": 0,
//!         "childeren": [ ... ]
//!     }
//! ]
//! ```
//!
//! `childeren` is the historical key spelling of this format and is kept on
//! write; `children` is accepted on read.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::diagnostic::GenError;
use crate::project::section::{locate_bracket_block, replace_section, Section};
use super::merge::{merge_descriptor, renumber, MergeMode};
use super::{MenuDescriptor, MenuNode};

pub const LABEL_MENU_ITEMS: &str = "menuItems = [";
pub const LABEL_END_LIST: &str = "]";
const BLOCK_PREFIX: &str = "menuItems = ";

/// Wire form of a node in the inline block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineItem {
    #[serde(rename = "displayName")]
    pub display_name: String,

    #[serde(rename = "iconName", default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,

    #[serde(default)]
    pub index: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    #[serde(
        rename = "childeren",
        alias = "children",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub childeren: Option<Vec<InlineItem>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<InlineItem> for MenuNode {
    fn from(item: InlineItem) -> Self {
        MenuNode {
            caption: item.display_name,
            icon: item.icon_name,
            id: None,
            index: item.index,
            route: item.route,
            children: item
                .childeren
                .map(|children| children.into_iter().map(MenuNode::from).collect()),
            extra: item.extra,
        }
    }
}

impl From<MenuNode> for InlineItem {
    fn from(node: MenuNode) -> Self {
        InlineItem {
            display_name: node.caption,
            icon_name: node.icon,
            index: node.index,
            route: node.route,
            childeren: node
                .children
                .map(|children| children.into_iter().map(InlineItem::from).collect()),
            extra: node.extra,
        }
    }
}

/// Locates and parses the inline menu block, searching from line `from`.
pub fn read_menu_block(lines: &[String], from: usize) -> Result<(Section, Vec<MenuNode>), GenError> {
    let section = locate_bracket_block(lines, from, LABEL_MENU_ITEMS)?;
    let block = section.slice(lines);

    // Drop everything before the opening bracket on the first line.
    let mut text = String::new();
    for (idx, line) in block.iter().enumerate() {
        if idx == 0 {
            let pos = line.find('[').unwrap_or(0);
            text.push_str(&line[pos..]);
        } else {
            text.push_str(line);
        }
        text.push('\n');
    }

    match serde_json::from_str::<Vec<InlineItem>>(&text) {
        Ok(items) => Ok((section, items.into_iter().map(MenuNode::from).collect())),
        Err(err) => {
            let listing: Vec<String> = block
                .iter()
                .enumerate()
                .map(|(line_no, line)| format!("{:04} : {}", line_no, line.trim_end_matches('\r')))
                .collect();
            for entry in &listing {
                error!("{}", entry);
            }
            Err(GenError::MalformedMenuBlock {
                message: err.to_string(),
                line: section.start + err.line().max(1),
                listing: listing.join("\n"),
            })
        }
    }
}

/// Serializes `items` as the inline block.
pub fn render_menu_block(items: &[MenuNode]) -> Result<Vec<String>, GenError> {
    if items.is_empty() {
        return Ok(vec![LABEL_MENU_ITEMS.to_string(), LABEL_END_LIST.to_string()]);
    }

    let wire: Vec<InlineItem> = items.iter().cloned().map(InlineItem::from).collect();
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    wire.serialize(&mut ser)
        .map_err(|e| GenError::CodegenFailed { message: format!("menu block: {}", e) })?;
    let json = String::from_utf8(buf)
        .map_err(|e| GenError::CodegenFailed { message: format!("menu block: {}", e) })?;

    Ok(format!("{}{}", BLOCK_PREFIX, json)
        .lines()
        .map(String::from)
        .collect())
}

/// Replaces the block at `section` with `items`.
pub fn write_menu_block(
    lines: &mut Vec<String>,
    section: Section,
    items: &[MenuNode],
) -> Result<Section, GenError> {
    let block = render_menu_block(items)?;
    Ok(replace_section(lines, section, block))
}

/// Merges `descriptors` into the inline block and writes it back.
///
/// Indices are renumbered to positional order at every depth afterwards.
/// Returns the merged tree.
pub fn merge_inline_menu<'a>(
    lines: &mut Vec<String>,
    from: usize,
    descriptors: impl IntoIterator<Item = &'a MenuDescriptor>,
) -> Result<Vec<MenuNode>, GenError> {
    let (section, mut items) = read_menu_block(lines, from)?;
    for desc in descriptors {
        merge_descriptor(&mut items, desc, "", MergeMode::Inline);
    }
    renumber(&mut items);
    write_menu_block(lines, section, &items)?;
    Ok(items)
}
