//! Descriptor-into-tree merge shared by the inline and sidecar formats.
//!
//! Siblings are matched on caption. A matched leaf is updated in place, a
//! matched group is descended into (subject to [`MergeMode`]) and anything
//! unmatched is inserted as a new node.

use tracing::{debug, warn};

use super::id::{child_prefix, make_menu_id};
use super::{MenuDescriptor, MenuNode, Placement};

/// How a merge treats ids, placement and existing groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Schema version 1: no stored ids, `placement` ignored, always recurse.
    Inline,
    /// Schema version 2: ids stored, `placement` honoured.
    Sidecar {
        /// Descend into groups that already exist. Off by default, in which
        /// case a matched group keeps its children as they are.
        recurse_existing: bool,
    },
}

impl MergeMode {
    fn stores_ids(self) -> bool {
        matches!(self, MergeMode::Sidecar { .. })
    }

    fn recurses_into_existing(self) -> bool {
        match self {
            MergeMode::Inline => true,
            MergeMode::Sidecar { recurse_existing } => recurse_existing,
        }
    }
}

/// Merges one descriptor into `siblings`.
///
/// `id_prefix` is the prefix of the level being merged (`""` at the top).
pub fn merge_descriptor(
    siblings: &mut Vec<MenuNode>,
    desc: &MenuDescriptor,
    id_prefix: &str,
    mode: MergeMode,
) {
    let id = make_menu_id(&desc.caption, id_prefix);

    if let Some(node) = siblings.iter_mut().find(|n| n.caption == desc.caption) {
        update_existing(node, desc, &id, mode);
        return;
    }

    let position = insertion_point(siblings, desc, mode);
    let mut node = MenuNode {
        caption: desc.caption.clone(),
        icon: desc.icon.clone(),
        id: mode.stores_ids().then(|| id.clone()),
        index: position as i64,
        route: desc.route.clone(),
        children: None,
        extra: serde_json::Map::new(),
    };

    if let Some(sub) = &desc.submenu {
        let mut children = Vec::new();
        merge_descriptor(&mut children, sub, &child_prefix(&id), mode);
        node.children = Some(children);
    }

    debug!(caption = %desc.caption, position, "inserting menu node");
    siblings.insert(position, node);
}

fn update_existing(node: &mut MenuNode, desc: &MenuDescriptor, id: &str, mode: MergeMode) {
    if mode.stores_ids() {
        node.id = Some(id.to_string());
    }

    match &desc.submenu {
        Some(sub) => {
            let children = node.children.get_or_insert_with(Vec::new);
            if mode.recurses_into_existing() {
                merge_descriptor(children, sub, &child_prefix(id), mode);
            } else {
                debug!(caption = %desc.caption, "existing group left as is");
            }
        }
        None => {
            debug!(caption = %desc.caption, "updating menu node in place");
            node.caption = desc.caption.clone();
            if desc.icon.is_some() {
                node.icon = desc.icon.clone();
            }
            if desc.route.is_some() {
                node.route = desc.route.clone();
            }
            if mode == MergeMode::Inline {
                node.index = desc.index;
            }
        }
    }
}

/// Resolves where a new node goes among `siblings`.
fn insertion_point(siblings: &[MenuNode], desc: &MenuDescriptor, mode: MergeMode) -> usize {
    if let (MergeMode::Sidecar { .. }, Some(placement)) = (mode, &desc.placement) {
        let (anchor, offset) = match placement {
            Placement::After(caption) => (caption, 1),
            Placement::Before(caption) => (caption, 0),
        };
        return match siblings.iter().position(|n| &n.caption == anchor) {
            Some(pos) => pos + offset,
            None => {
                warn!(
                    caption = %desc.caption,
                    anchor = %anchor,
                    "placement anchor not found, appending"
                );
                siblings.len()
            }
        };
    }
    index_position(siblings.len(), desc.index)
}

/// Maps a requested index onto a position in a list of `len` siblings.
///
/// Non-negative indices count from the start, negative ones from the end
/// (`-1` is after the last element). Out-of-range values are clamped.
pub fn index_position(len: usize, index: i64) -> usize {
    if index >= 0 {
        (index as usize).min(len)
    } else {
        (len as i64 + index + 1).max(0) as usize
    }
}

/// Rewrites every `index` field to its position, at every depth.
pub fn renumber(siblings: &mut [MenuNode]) {
    for (position, node) in siblings.iter_mut().enumerate() {
        node.index = position as i64;
        if let Some(children) = node.children.as_mut() {
            renumber(children);
        }
    }
}
