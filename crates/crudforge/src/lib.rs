//! # crudforge
//!
//! Bookkeeping engine for a CRUD scaffolding generator. Rendering a table
//! into backend and frontend source files is left to a [`Renderer`]; this
//! crate keeps everything around those files consistent across repeated
//! runs:
//!
//! - the import section and `listModules` registry of the project file
//! - the navigation menu, stored inline (schema 1) or in a sidecar
//!   document (schema 2)
//! - the Python package layout and `__init__.py` re-exports of each module
//!
//! ## Architecture
//!
//! ```text
//! GeneratorConfig (tables, menu descriptors)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Package    │  module dir checks, __init__.py exports
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Project    │  imports + listModules block
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Menu     │  inline JSON block  or  sidecar document
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudforge::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::load("crud.json".as_ref())?;
//! let report = Generator::new(config).update_project()?;
//! println!("{} modules registered", report.modules.len());
//! ```

pub mod config;
pub mod diagnostic;
pub mod menu;
pub mod project;

use std::path::{Path, PathBuf};
use tracing::info;

pub use config::{GeneratorConfig, MenuSchema, TableConfig};
pub use diagnostic::GenError;
pub use menu::{MenuDescriptor, MenuDocument, MenuNode, MergeOptions, Placement};
pub use project::ProjectFile;

use project::{backup, package, template};

/// Renders one template for one table. Template engines plug in here.
pub trait Renderer {
    fn render(&self, template: &Path, table: &TableConfig) -> Result<String, GenError>;
}

/// Orchestrates a generator run against one project tree.
pub struct Generator {
    config: GeneratorConfig,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// The project file that was written.
    pub project_file: PathBuf,
    /// Backup of the previous project file, if one was made.
    pub backup: Option<PathBuf>,
    /// Sidecar document that was written (schema 2 only).
    pub sidecar: Option<PathBuf>,
    /// Import lines added by this run.
    pub imports_added: Vec<String>,
    /// Final module registry.
    pub modules: Vec<String>,
    /// Number of menu nodes after the merge.
    pub menu_nodes: usize,
    /// Files written by the renderer.
    pub rendered: Vec<PathBuf>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Updates the project file (and sidecar document) for all tables.
    ///
    /// Nothing is written unless the whole update succeeds.
    pub fn update_project(&self) -> Result<UpdateReport, GenError> {
        let path = self.config.project_path();
        let mut file = ProjectFile::load_or_template(&path, &self.config.application)?;

        let sidecar_path = self.config.sidecar_path();
        let mut sidecar = match self.config.menu_schema {
            MenuSchema::Sidecar => MenuDocument::load(&sidecar_path)?,
            MenuSchema::Inline => MenuDocument::default(),
        };

        let update = project::update_project_lines(&mut file, &self.config, &mut sidecar)?;

        let backup = if self.config.backup {
            backup::backup_file(&path)?
        } else {
            None
        };
        file.write(&path)?;
        info!(path = %path.display(), modules = update.modules.len(), "project file written");

        let sidecar_written = match self.config.menu_schema {
            MenuSchema::Sidecar => {
                sidecar.save(&sidecar_path)?;
                Some(sidecar_path)
            }
            MenuSchema::Inline => None,
        };

        Ok(UpdateReport {
            project_file: path,
            backup,
            sidecar: sidecar_written,
            imports_added: update.imports_added,
            modules: update.modules,
            menu_nodes: MenuNode::count(&update.menu),
            rendered: Vec::new(),
        })
    }

    /// Renders every template for every table, maintains the package
    /// layout around the output, then updates the project file.
    ///
    /// The output file name is the template file name without a trailing
    /// `.templ`. A table whose module directory already exists is rejected
    /// before anything in it is touched, unless `overwrite` is set.
    pub fn generate_backend(
        &self,
        templates: &[PathBuf],
        renderer: &dyn Renderer,
    ) -> Result<UpdateReport, GenError> {
        let source = &self.config.source_folder;
        let mut rendered = Vec::new();

        for table in &self.config.tables {
            let table_name = self.config.table_name(table);
            let module = self.config.module_name(table);
            package::ensure_module_free(&self.config.module_dir(table), &table.name, self.config.overwrite)?;

            let module_dir = package::ensure_package(source, &[self.config.application.as_str(), table_name.as_str()])?;
            let init = module_dir.join("__init__.py");
            if self.config.backup {
                backup::backup_file(&init)?;
            }

            for templ in templates {
                let file_name = output_name(templ);
                let content = renderer.render(templ, table)?;
                let target = module_dir.join(&file_name);
                std::fs::write(&target, content).map_err(|e| GenError::io(&target, e.to_string()))?;
                info!(template = %templ.display(), table = %table.name, "rendered");
                rendered.push(target);

                let stem = Path::new(&file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| file_name.clone());
                package::add_package_export(&init, &template::export_line(&module, &stem))?;
            }
        }

        let mut report = self.update_project()?;
        report.rendered = rendered;
        Ok(report)
    }

    /// Current menu tree in the configured format.
    pub fn menu_tree(&self) -> Result<Vec<MenuNode>, GenError> {
        match self.config.menu_schema {
            MenuSchema::Sidecar => Ok(MenuDocument::load(&self.config.sidecar_path())?.items),
            MenuSchema::Inline => {
                let file = ProjectFile::load_or_template(&self.config.project_path(), &self.config.application)?;
                let imports = project::locate_import_section(&file.lines);
                let (_, items) = menu::inline::read_menu_block(&file.lines, imports.start)?;
                Ok(items)
            }
        }
    }

    /// Moves the menu tree into the `target` format.
    ///
    /// Both the project file and the sidecar document are written. Returns
    /// the number of nodes moved. The configuration's `menuSchema` still has
    /// to be switched by the caller.
    pub fn migrate(&self, target: MenuSchema) -> Result<usize, GenError> {
        let path = self.config.project_path();
        let sidecar_path = self.config.sidecar_path();
        let mut file = ProjectFile::load_or_template(&path, &self.config.application)?;
        let mut doc = MenuDocument::load(&sidecar_path)?;
        let from = project::locate_import_section(&file.lines).start;

        let moved = match target {
            MenuSchema::Sidecar => menu::migrate::migrate_inline_to_sidecar(&mut file.lines, from, &mut doc)?,
            MenuSchema::Inline => menu::migrate::migrate_sidecar_to_inline(&doc, &mut file.lines, from)?,
        };

        if self.config.backup {
            backup::backup_file(&path)?;
            backup::backup_file(&sidecar_path)?;
        }
        file.write(&path)?;
        match target {
            MenuSchema::Sidecar => doc.save(&sidecar_path)?,
            MenuSchema::Inline => {
                // The tree now lives inline; leave an empty sidecar behind.
                if sidecar_path.exists() {
                    MenuDocument::default().save(&sidecar_path)?;
                }
            }
        }

        info!(moved, target = u8::from(target), "menu migrated");
        Ok(moved)
    }
}

/// Output file name for a template path.
fn output_name(template: &Path) -> String {
    let name = template
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.strip_suffix(".templ") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
