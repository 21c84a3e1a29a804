//! Generator configuration.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::diagnostic::GenError;
use crate::menu::{MenuDescriptor, MergeOptions};

/// Where the menu tree is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u8")]
pub enum MenuSchema {
    /// Version 1: `menuItems = [...]` block inside the project file.
    #[default]
    Inline,
    /// Version 2: separate sidecar document.
    Sidecar,
}

impl TryFrom<u64> for MenuSchema {
    type Error = GenError;

    fn try_from(version: u64) -> Result<Self, Self::Error> {
        match version {
            1 => Ok(MenuSchema::Inline),
            2 => Ok(MenuSchema::Sidecar),
            _ => Err(GenError::UnsupportedSchemaVersion { version }),
        }
    }
}

impl From<MenuSchema> for u8 {
    fn from(schema: MenuSchema) -> u8 {
        match schema {
            MenuSchema::Inline => 1,
            MenuSchema::Sidecar => 2,
        }
    }
}

/// One generated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name; also the name of the generated module.
    pub name: String,

    /// Model class name handed to the renderer.
    #[serde(rename = "class", default)]
    pub class_name: String,

    /// REST endpoint of the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Menu entry for the table, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuDescriptor>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            uri: None,
            menu: None,
        }
    }

    pub fn with_menu(mut self, menu: MenuDescriptor) -> Self {
        self.menu = Some(menu);
        self
    }
}

/// Configuration for a generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Python package of the application.
    pub application: String,

    /// Backend source root. Relative paths are resolved against the
    /// directory of the configuration file.
    #[serde(default = "default_source_folder")]
    pub source_folder: PathBuf,

    /// Project file inside the application package.
    #[serde(default = "default_project_file")]
    pub project_file: String,

    /// Menu persistence format (1 or 2).
    #[serde(default)]
    pub menu_schema: MenuSchema,

    /// Sidecar document file name, next to the project file.
    #[serde(default = "default_sidecar")]
    pub sidecar: String,

    /// Copy files to a `.bak` before rewriting them.
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Allow regenerating modules that already exist.
    #[serde(default)]
    pub overwrite: bool,

    /// Lower-case table names in module paths.
    #[serde(default)]
    pub ignore_case_db_ids: bool,

    /// Let the sidecar merge descend into existing menu groups.
    #[serde(default)]
    pub recurse_existing_sidecar_nodes: bool,

    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

fn default_source_folder() -> PathBuf {
    PathBuf::from(".")
}

fn default_project_file() -> String {
    "main.py".to_string()
}

fn default_sidecar() -> String {
    "menu.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new("app")
    }
}

impl GeneratorConfig {
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            source_folder: default_source_folder(),
            project_file: default_project_file(),
            menu_schema: MenuSchema::default(),
            sidecar: default_sidecar(),
            backup: true,
            overwrite: false,
            ignore_case_db_ids: false,
            recurse_existing_sidecar_nodes: false,
            tables: Vec::new(),
        }
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e.to_string()))?;

        let parse_error = |e: serde_json::Error| GenError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let raw: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
        if let Some(version) = raw.get("menuSchema").and_then(serde_json::Value::as_u64) {
            MenuSchema::try_from(version)?;
        }
        let mut config: Self = serde_json::from_value(raw).map_err(parse_error)?;

        if config.source_folder.is_relative() {
            if let Some(base) = path.parent() {
                config.source_folder = base.join(&config.source_folder);
            }
        }

        Ok(config)
    }

    /// Directory of the application package.
    pub fn app_dir(&self) -> PathBuf {
        self.source_folder.join(&self.application)
    }

    pub fn project_path(&self) -> PathBuf {
        self.app_dir().join(&self.project_file)
    }

    pub fn sidecar_path(&self) -> PathBuf {
        self.app_dir().join(&self.sidecar)
    }

    /// Table name as used in paths and module names.
    pub fn table_name(&self, table: &TableConfig) -> String {
        if self.ignore_case_db_ids {
            table.name.to_lowercase()
        } else {
            table.name.clone()
        }
    }

    /// Dotted module path of a table, e.g. `app.role`.
    pub fn module_name(&self, table: &TableConfig) -> String {
        format!("{}.{}", self.application, self.table_name(table))
    }

    pub fn module_dir(&self, table: &TableConfig) -> PathBuf {
        self.app_dir().join(self.table_name(table))
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            recurse_existing: self.recurse_existing_sidecar_nodes,
        }
    }

    /// Menu descriptors of all tables, in configuration order.
    pub fn menu_descriptors(&self) -> impl Iterator<Item = &MenuDescriptor> {
        self.tables.iter().filter_map(|t| t.menu.as_ref())
    }
}
