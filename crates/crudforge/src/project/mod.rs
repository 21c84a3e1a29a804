//! The generated project file and the bookkeeping performed on it.
//!
//! A run updates the project file in three steps, all against the same line
//! vector:
//!
//! 1. one `import <app>.<table>` line per table in the import section
//! 2. the `listModules = [...]` registry block
//! 3. the menu, either in the inline `menuItems = [...]` block or in the
//!    sidecar document, depending on [`MenuSchema`]
//!
//! Every step is idempotent: a second run with the same configuration leaves
//! the file byte-identical.

pub mod backup;
pub mod insert;
pub mod modules;
pub mod package;
pub mod section;
pub mod template;

use std::path::Path;
use tracing::{debug, info};

use crate::config::{GeneratorConfig, MenuSchema};
use crate::diagnostic::GenError;
use crate::menu::inline::merge_inline_menu;
use crate::menu::{MenuDocument, MenuNode};

pub use insert::insert_unique;
pub use modules::rewrite_module_list;
pub use section::{locate_bracket_block, locate_import_section, locate_section, replace_section, Section};

/// Files with at most this many lines are replaced by the built-in template.
const MIN_PROJECT_LINES: usize = 2;

/// A text file held as lines without terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFile {
    pub lines: Vec<String>,
    /// Whether the text ended with a newline.
    pub trailing_newline: bool,
}

impl ProjectFile {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(String::from).collect(),
            trailing_newline: text.ends_with('\n'),
        }
    }

    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }

    pub fn read(path: &Path) -> Result<Self, GenError> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e.to_string()))?;
        Ok(Self::parse(&text))
    }

    pub fn write(&self, path: &Path) -> Result<(), GenError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e.to_string()))?;
        }
        std::fs::write(path, self.render()).map_err(|e| GenError::io(path, e.to_string()))
    }

    /// Reads the project file, falling back to the built-in template when it
    /// is missing or (nearly) empty.
    pub fn load_or_template(path: &Path, application: &str) -> Result<Self, GenError> {
        if path.is_file() {
            let file = Self::read(path)?;
            if file.lines.len() > MIN_PROJECT_LINES {
                return Ok(file);
            }
        }
        info!(path = %path.display(), "starting from built-in project template");
        Ok(Self::parse(&template::generate_project_file(application)))
    }
}

/// What a project update changed.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    /// Import lines that were not present before.
    pub imports_added: Vec<String>,
    /// Final contents of the module registry.
    pub modules: Vec<String>,
    /// Menu tree after the merge, in whichever format was updated.
    pub menu: Vec<MenuNode>,
}

/// Applies imports, module registry and menu merge to `file`.
///
/// With [`MenuSchema::Sidecar`] the menu goes into `sidecar` and the inline
/// block is left alone. On error `file` is unchanged.
pub fn update_project_lines(
    file: &mut ProjectFile,
    config: &GeneratorConfig,
    sidecar: &mut MenuDocument,
) -> Result<ProjectUpdate, GenError> {
    let mut lines = file.lines.clone();
    let mut imports = locate_import_section(&lines);
    let mut update = ProjectUpdate::default();

    let mut modules = Vec::with_capacity(config.tables.len());
    for table in &config.tables {
        let module = config.module_name(table);
        let line = template::import_line(&module);
        if insert_unique(&mut lines, &mut imports, &line) {
            update.imports_added.push(line);
        }
        modules.push(module);
    }
    debug!(added = update.imports_added.len(), "import section updated");

    update.modules = rewrite_module_list(&mut lines, imports.start, &modules)?;

    update.menu = match config.menu_schema {
        MenuSchema::Inline => merge_inline_menu(&mut lines, imports.start, config.menu_descriptors())?,
        MenuSchema::Sidecar => {
            sidecar.merge(config.menu_descriptors(), config.merge_options());
            sidecar.items.clone()
        }
    };

    file.lines = lines;
    Ok(update)
}
