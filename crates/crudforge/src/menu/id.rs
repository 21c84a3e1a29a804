//! Stable menu node ids.

use md5::{Digest, Md5};

/// Derives the id of a node from its caption and the id prefix of its parent.
///
/// The prefix of a child is `parent_id + "_"`; top-level nodes use `""`. The
/// result is the uppercase hex md5 of `prefix + caption`, so an id only
/// changes when the caption or an ancestor caption changes.
pub fn make_menu_id(caption: &str, id_prefix: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(id_prefix.as_bytes());
    hasher.update(caption.as_bytes());
    hex::encode_upper(hasher.finalize())
}

/// Prefix handed to the children of the node with `id`.
pub fn child_prefix(id: &str) -> String {
    format!("{}_", id)
}
