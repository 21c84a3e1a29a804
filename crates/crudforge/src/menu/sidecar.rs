//! Sidecar menu document (schema version 2).
//!
//! The document (`menu.json` by default) sits next to the project file and
//! holds the menu tree with stable node ids. Unlike the inline block it is
//! never renumbered; new nodes are placed by `placement` or `index` when
//! they are created.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::diagnostic::GenError;
use super::merge::{merge_descriptor, MergeMode};
use super::{MenuDescriptor, MenuNode, MergeOptions};

/// The sidecar document format version.
pub const SIDECAR_VERSION: u32 = 2;

/// The complete sidecar document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDocument {
    /// Document format version.
    pub version: u32,

    /// Top-level menu entries.
    #[serde(default)]
    pub items: Vec<MenuNode>,
}

/// Accepted on-disk shapes: the versioned document or a bare node list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Document(MenuDocument),
    Items(Vec<MenuNode>),
}

impl Default for MenuDocument {
    fn default() -> Self {
        Self {
            version: SIDECAR_VERSION,
            items: Vec::new(),
        }
    }
}

impl MenuDocument {
    /// Load a sidecar document from disk.
    ///
    /// A missing file is an empty menu, not an error.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let parsed: OnDisk = serde_json::from_str(&content).map_err(|e| GenError::SidecarParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(match parsed {
            OnDisk::Document(doc) => doc,
            OnDisk::Items(items) => Self {
                version: SIDECAR_VERSION,
                items,
            },
        })
    }

    /// Save the document to disk.
    pub fn save(&self, path: &Path) -> Result<(), GenError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| GenError::io(
            path,
            format!("Failed to serialize sidecar document: {}", e),
        ))?;

        std::fs::write(path, content + "\n").map_err(|e| GenError::io(path, e.to_string()))?;
        info!(path = %path.display(), "wrote sidecar menu document");
        Ok(())
    }

    /// Merges `descriptors` into the document, in order.
    pub fn merge<'a>(
        &mut self,
        descriptors: impl IntoIterator<Item = &'a MenuDescriptor>,
        options: MergeOptions,
    ) {
        let mode = MergeMode::Sidecar {
            recurse_existing: options.recurse_existing,
        };
        for desc in descriptors {
            merge_descriptor(&mut self.items, desc, "", mode);
        }
    }

    /// Number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        MenuNode::count(&self.items)
    }
}
