//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while updating a generated project.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GenError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("I/O failure on '{}': {message}", path.display())]
    #[diagnostic(code(crudforge::io::failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Failed to parse configuration '{}': {message}", path.display())]
    #[diagnostic(
        code(crudforge::config::parse_failed),
        help("The configuration is a JSON object with at least 'application' and 'tables'.")
    )]
    ConfigParse {
        path: PathBuf,
        message: String,
    },

    #[error("Unsupported menu schema version: {version}")]
    #[diagnostic(
        code(crudforge::config::unsupported_schema),
        help("Use 1 for the inline menuItems block or 2 for the sidecar document.")
    )]
    UnsupportedSchemaVersion {
        version: u64,
    },

    // =========================================================================
    // Project File Errors
    // =========================================================================
    #[error("Section '{start_marker}' ... '{end_marker}' not found in project file")]
    #[diagnostic(
        code(crudforge::section::not_found),
        help("Restore the maintained section markers, or delete the project file to start from the built-in template.")
    )]
    SectionNotFound {
        start_marker: String,
        end_marker: String,
    },

    #[error("Malformed menu block at line {line}: {message}")]
    #[diagnostic(
        code(crudforge::menu::malformed_block),
        help("{listing}")
    )]
    MalformedMenuBlock {
        message: String,
        /// 1-based line number inside the project file.
        line: usize,
        /// Numbered dump of the block as it was read.
        listing: String,
    },

    #[error("Failed to parse sidecar menu document '{}': {message}", path.display())]
    #[diagnostic(code(crudforge::menu::sidecar_parse_failed))]
    SidecarParse {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Generation Errors
    // =========================================================================
    #[error("Module '{table}' already exists at {}", path.display())]
    #[diagnostic(
        code(crudforge::generate::module_exists),
        help("Set \"overwrite\": true in the configuration, or remove the table from it.")
    )]
    ModuleExistsAlready {
        table: String,
        path: PathBuf,
    },

    #[error("Failed to generate output: {message}")]
    #[diagnostic(code(crudforge::generate::generation_failed))]
    CodegenFailed {
        message: String,
    },

    #[error("Failed to render template '{}' for table '{table}': {message}", template.display())]
    #[diagnostic(code(crudforge::generate::render_failed))]
    RenderFailed {
        template: PathBuf,
        table: String,
        message: String,
    },
}

impl GenError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a section-not-found error for the given marker pair.
    pub fn section_not_found(start_marker: &str, end_marker: &str) -> Self {
        Self::SectionNotFound {
            start_marker: start_marker.to_string(),
            end_marker: end_marker.to_string(),
        }
    }
}
