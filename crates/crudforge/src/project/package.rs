//! Python package bookkeeping around each rendered module.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::diagnostic::GenError;
use super::insert::insert_unique;
use super::section::Section;
use super::ProjectFile;

/// Fails when a module directory exists and may not be overwritten.
pub fn ensure_module_free(module_dir: &Path, table: &str, overwrite: bool) -> Result<(), GenError> {
    if module_dir.is_dir() && !overwrite {
        return Err(GenError::ModuleExistsAlready {
            table: table.to_string(),
            path: module_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Creates `root/parts[0]/parts[1]/...` with an `__init__.py` at every level
/// below `root`. Existing init files are left alone.
pub fn ensure_package(root: &Path, parts: &[&str]) -> Result<PathBuf, GenError> {
    let mut dir = root.to_path_buf();
    for part in parts {
        dir.push(part);
        std::fs::create_dir_all(&dir).map_err(|e| GenError::io(&dir, e.to_string()))?;

        let init = dir.join("__init__.py");
        if !init.exists() {
            std::fs::write(&init, "\n").map_err(|e| GenError::io(&init, e.to_string()))?;
            debug!(path = %init.display(), "created package init");
        }
    }
    Ok(dir)
}

/// Adds `line` to the init file unless it is already there.
pub fn add_package_export(init_path: &Path, line: &str) -> Result<bool, GenError> {
    let mut file = if init_path.exists() {
        ProjectFile::read(init_path)?
    } else {
        ProjectFile::default()
    };

    // A freshly created init file is a single blank line.
    if file.lines.iter().all(|l| l.trim().is_empty()) {
        file.lines.clear();
    }

    let mut section = Section::new(0, file.lines.len());
    let added = insert_unique(&mut file.lines, &mut section, line);
    if added {
        file.trailing_newline = true;
        file.write(init_path)?;
        info!(path = %init_path.display(), line, "export added");
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_package_creates_inits() {
        let dir = TempDir::new().unwrap();
        let module = ensure_package(dir.path(), &["testrun", "role"]).unwrap();
        assert_eq!(module, dir.path().join("testrun").join("role"));
        assert!(dir.path().join("testrun").join("__init__.py").is_file());
        assert!(module.join("__init__.py").is_file());
    }

    #[test]
    fn test_module_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("role")).unwrap();
        assert!(matches!(
            ensure_module_free(&dir.path().join("role"), "role", false),
            Err(GenError::ModuleExistsAlready { .. })
        ));
        assert!(ensure_module_free(&dir.path().join("role"), "role", true).is_ok());
        assert!(ensure_module_free(&dir.path().join("user"), "user", false).is_ok());
    }

    #[test]
    fn test_exports_are_unique() {
        let dir = TempDir::new().unwrap();
        let module = ensure_package(dir.path(), &["app", "role"]).unwrap();
        let init = module.join("__init__.py");

        assert!(add_package_export(&init, "from app.role.model import *").unwrap());
        assert!(add_package_export(&init, "from app.role.view import *").unwrap());
        assert!(!add_package_export(&init, "from app.role.model import *").unwrap());

        assert_eq!(
            std::fs::read_to_string(&init).unwrap(),
            "from app.role.model import *\nfrom app.role.view import *\n"
        );
    }
}
