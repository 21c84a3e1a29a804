//! Moving the menu tree between the inline block and the sidecar document.

use tracing::debug;

use crate::diagnostic::GenError;
use super::id::{child_prefix, make_menu_id};
use super::inline::{read_menu_block, write_menu_block};
use super::merge::renumber;
use super::{MenuDocument, MenuNode};

/// Fills in the id of every node, deriving each from its parent chain.
pub fn assign_ids(items: &mut [MenuNode], id_prefix: &str) {
    for node in items.iter_mut() {
        let id = make_menu_id(&node.caption, id_prefix);
        if let Some(children) = node.children.as_mut() {
            assign_ids(children, &child_prefix(&id));
        }
        node.id = Some(id);
    }
}

/// Removes ids at every depth.
pub fn strip_ids(items: &mut [MenuNode]) {
    for node in items.iter_mut() {
        node.id = None;
        if let Some(children) = node.children.as_mut() {
            strip_ids(children);
        }
    }
}

/// Merges already built nodes into `target`, matching siblings by caption.
///
/// Matched nodes keep their position and take over the incoming fields that
/// are set; their children are merged the same way.
pub fn merge_nodes(target: &mut Vec<MenuNode>, incoming: Vec<MenuNode>) {
    for node in incoming {
        match target.iter_mut().find(|n| n.caption == node.caption) {
            Some(existing) => {
                debug!(caption = %node.caption, "merging migrated node");
                if node.icon.is_some() {
                    existing.icon = node.icon;
                }
                if node.route.is_some() {
                    existing.route = node.route;
                }
                existing.id = node.id.or(existing.id.take());
                existing.extra.extend(node.extra);
                if let Some(children) = node.children {
                    merge_nodes(existing.children.get_or_insert_with(Vec::new), children);
                }
            }
            None => target.push(node),
        }
    }
}

/// Moves the inline block into `doc` and empties the block.
///
/// Returns the number of nodes moved.
pub fn migrate_inline_to_sidecar(
    lines: &mut Vec<String>,
    from: usize,
    doc: &mut MenuDocument,
) -> Result<usize, GenError> {
    let (section, mut items) = read_menu_block(lines, from)?;
    let moved = MenuNode::count(&items);

    assign_ids(&mut items, "");
    merge_nodes(&mut doc.items, items);
    write_menu_block(lines, section, &[])?;
    Ok(moved)
}

/// Writes the sidecar tree into the inline block, merging with whatever the
/// block already holds. Ids are dropped and indices renumbered.
///
/// Returns the number of nodes moved.
pub fn migrate_sidecar_to_inline(
    doc: &MenuDocument,
    lines: &mut Vec<String>,
    from: usize,
) -> Result<usize, GenError> {
    let (section, mut items) = read_menu_block(lines, from)?;
    let mut incoming = doc.items.clone();
    strip_ids(&mut incoming);

    merge_nodes(&mut items, incoming);
    renumber(&mut items);
    write_menu_block(lines, section, &items)?;
    Ok(MenuNode::count(&doc.items))
}
