//! Navigation menu model and merge engines.
//!
//! A generator run turns each table's [`MenuDescriptor`] into a [`MenuNode`]
//! in a persisted tree. Two on-disk representations exist:
//!
//! - [`inline`]: a `menuItems = [...]` JSON block embedded in the project file
//!   (schema version 1). Indices are renumbered after every merge.
//! - [`sidecar`]: a separate JSON document (schema version 2). Nodes carry
//!   stable ids and may be positioned relative to a sibling.
//!
//! [`migrate`] moves a tree from one representation to the other.

pub mod id;
pub mod inline;
pub mod merge;
pub mod migrate;
pub mod sidecar;

use serde::{Deserialize, Serialize};

pub use id::make_menu_id;
pub use merge::{index_position, merge_descriptor, renumber, MergeMode};
pub use sidecar::MenuDocument;

/// Request to add or update one navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDescriptor {
    /// Display label. Siblings are matched on it.
    #[serde(alias = "displayName")]
    pub caption: String,

    #[serde(default, alias = "iconName", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Route of a leaf entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Nested entry for a non-leaf descriptor.
    #[serde(default, alias = "menu", skip_serializing_if = "Option::is_none")]
    pub submenu: Option<Box<MenuDescriptor>>,

    /// Absolute position when non-negative; counted from the end when
    /// negative (`-1` appends).
    #[serde(default = "default_index")]
    pub index: i64,

    /// Relative position, honoured by the sidecar merge only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

fn default_index() -> i64 {
    -1
}

impl MenuDescriptor {
    /// A leaf entry pointing at `route`, appended at the end of its siblings.
    pub fn leaf(caption: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            icon: None,
            route: Some(route.into()),
            submenu: None,
            index: default_index(),
            placement: None,
        }
    }

    /// A group entry wrapping `submenu`.
    pub fn group(caption: impl Into<String>, submenu: MenuDescriptor) -> Self {
        Self {
            caption: caption.into(),
            icon: None,
            route: None,
            submenu: Some(Box::new(submenu)),
            index: default_index(),
            placement: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn at(mut self, index: i64) -> Self {
        self.index = index;
        self
    }

    pub fn after(mut self, caption: impl Into<String>) -> Self {
        self.placement = Some(Placement::After(caption.into()));
        self
    }

    pub fn before(mut self, caption: impl Into<String>) -> Self {
        self.placement = Some(Placement::Before(caption.into()));
        self
    }
}

/// Position relative to an existing sibling, identified by caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    After(String),
    Before(String),
}

/// Persisted menu entry.
///
/// Serializes with the sidecar key names; the inline block uses its own
/// wire type (see [`inline::InlineItem`]). Keys the generator does not know
/// are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    pub caption: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Stable content-derived id. Only the sidecar stores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub index: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MenuNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Total number of nodes in `items`, nested entries included.
    pub fn count(items: &[MenuNode]) -> usize {
        items
            .iter()
            .map(|n| 1 + n.children.as_deref().map(MenuNode::count).unwrap_or(0))
            .sum()
    }

    /// Finds a direct child of `items` by caption.
    pub fn find<'a>(items: &'a [MenuNode], caption: &str) -> Option<&'a MenuNode> {
        items.iter().find(|n| n.caption == caption)
    }
}

/// Options threaded into every merge call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Let the sidecar merge descend into groups that already exist.
    pub recurse_existing: bool,
}
