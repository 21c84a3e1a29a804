use std::path::{Path, PathBuf};

use crudforge::project::backup::backup_path;
use crudforge::{
    GenError, Generator, GeneratorConfig, MenuDescriptor, MenuDocument, MenuSchema, Renderer,
    TableConfig,
};

fn config(root: &Path, schema: MenuSchema) -> GeneratorConfig {
    let mut config = GeneratorConfig::new("testrun");
    config.source_folder = root.to_path_buf();
    config.menu_schema = schema;
    config.tables = vec![
        TableConfig::new("role", "Role").with_menu(
            MenuDescriptor::group("Admin", MenuDescriptor::leaf("Roles", "/roles")).with_icon("settings"),
        ),
        TableConfig::new("user", "User").with_menu(MenuDescriptor::leaf("Users", "/users").at(0)),
        TableConfig::new("log", "Log"),
    ];
    config
}

struct EchoRenderer;

impl Renderer for EchoRenderer {
    fn render(&self, template: &Path, table: &TableConfig) -> Result<String, GenError> {
        Ok(format!(
            "# {} for {}\nclass {}: pass\n",
            template.display(),
            table.name,
            table.class_name
        ))
    }
}

#[test]
fn inline_update_from_scratch_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Inline));

    let report = generator.update_project().unwrap();
    assert_eq!(report.imports_added.len(), 3);
    assert_eq!(report.modules, ["testrun.role", "testrun.user", "testrun.log"]);
    assert_eq!(report.menu_nodes, 3);
    assert!(report.backup.is_none());
    assert!(report.sidecar.is_none());

    let first = std::fs::read_to_string(&report.project_file).unwrap();
    let report = generator.update_project().unwrap();
    let second = std::fs::read_to_string(&report.project_file).unwrap();

    assert_eq!(first, second);
    assert!(report.imports_added.is_empty());
    assert_eq!(report.backup, Some(backup_path(&report.project_file)));

    let tree = generator.menu_tree().unwrap();
    let captions: Vec<&str> = tree.iter().map(|n| n.caption.as_str()).collect();
    assert_eq!(captions, ["Users", "Admin"]);
    assert_eq!(tree[1].index, 1);
}

#[test]
fn hand_edits_survive_regeneration() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Inline));
    let report = generator.update_project().unwrap();

    let text = std::fs::read_to_string(&report.project_file).unwrap();
    let edited = text
        .replace("    testrun.log\n]", "    testrun.log,\n    custom.module\n]")
        .replace("import logging\n", "import logging\nimport custom.module\n");
    std::fs::write(&report.project_file, &edited).unwrap();

    let report = generator.update_project().unwrap();
    assert_eq!(
        report.modules,
        ["testrun.role", "testrun.user", "testrun.log", "custom.module"]
    );
    let text = std::fs::read_to_string(&report.project_file).unwrap();
    assert!(text.contains("import custom.module\n"));
    assert_eq!(text.matches("import testrun.role").count(), 1);
}

#[test]
fn sidecar_update_writes_document() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Sidecar));

    let report = generator.update_project().unwrap();
    let sidecar = report.sidecar.clone().unwrap();
    let doc = MenuDocument::load(&sidecar).unwrap();
    assert_eq!(doc.node_count(), 3);
    assert!(doc.items.iter().all(|n| n.id.is_some()));

    let before = std::fs::read_to_string(&sidecar).unwrap();
    generator.update_project().unwrap();
    assert_eq!(std::fs::read_to_string(&sidecar).unwrap(), before);

    let project = std::fs::read_to_string(&report.project_file).unwrap();
    assert!(project.contains("menuItems = [\n]"));
}

#[test]
fn malformed_inline_block_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Inline));
    let report = generator.update_project().unwrap();

    let text = std::fs::read_to_string(&report.project_file).unwrap();
    let broken = text.replacen("\"displayName\": \"Users\",", "\"displayName\": Users,", 1);
    std::fs::write(&report.project_file, &broken).unwrap();

    let err = generator.update_project().unwrap_err();
    assert!(matches!(err, GenError::MalformedMenuBlock { .. }));
    assert_eq!(std::fs::read_to_string(&report.project_file).unwrap(), broken);
}

#[test]
fn migrate_between_formats() {
    let dir = tempfile::TempDir::new().unwrap();
    let inline = Generator::new(config(dir.path(), MenuSchema::Inline));
    inline.update_project().unwrap();

    let moved = inline.migrate(MenuSchema::Sidecar).unwrap();
    assert_eq!(moved, 3);

    let sidecar = Generator::new(config(dir.path(), MenuSchema::Sidecar));
    assert_eq!(sidecar.menu_tree().unwrap().len(), 2);
    assert!(inline.menu_tree().unwrap().is_empty());

    // Running in sidecar mode does not add anything new.
    let report = sidecar.update_project().unwrap();
    assert_eq!(report.menu_nodes, 3);

    let moved = sidecar.migrate(MenuSchema::Inline).unwrap();
    assert_eq!(moved, 3);
    assert_eq!(inline.menu_tree().unwrap().len(), 2);
    assert!(sidecar.menu_tree().unwrap().is_empty());
}

#[test]
fn generate_backend_maintains_packages() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Inline));
    let templates: Vec<PathBuf> = ["model.py.templ", "schema.py.templ", "view.py.templ"]
        .iter()
        .map(|name| PathBuf::from("templates/python").join(name))
        .collect();

    let report = generator.generate_backend(&templates, &EchoRenderer).unwrap();
    assert_eq!(report.rendered.len(), 9);

    let role = dir.path().join("testrun").join("role");
    assert!(role.join("model.py").is_file());
    assert!(dir.path().join("testrun").join("__init__.py").is_file());
    assert_eq!(
        std::fs::read_to_string(role.join("__init__.py")).unwrap(),
        "from testrun.role.model import *\nfrom testrun.role.schema import *\nfrom testrun.role.view import *\n"
    );

    let err = generator.generate_backend(&templates, &EchoRenderer).unwrap_err();
    assert!(matches!(err, GenError::ModuleExistsAlready { ref table, .. } if table == "role"));
}

#[test]
fn generate_backend_overwrite_keeps_exports_unique() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cfg = config(dir.path(), MenuSchema::Inline);
    cfg.overwrite = true;
    let generator = Generator::new(cfg);
    let templates = vec![PathBuf::from("model.py.templ")];

    generator.generate_backend(&templates, &EchoRenderer).unwrap();
    generator.generate_backend(&templates, &EchoRenderer).unwrap();

    let init = dir.path().join("testrun").join("user").join("__init__.py");
    assert_eq!(
        std::fs::read_to_string(init).unwrap(),
        "from testrun.user.model import *\n"
    );
}

const HAND_EDITED: &str = r#"import logging
import testrun.role   # import maintained by generator.py
from flask import Blueprint

listModules = [
    testrun.role,
    testrun.custom  # kept by hand
    ]

menuItems = [
    {
        "displayName": "Home",
        "index": 0,
        "route": "/"
    }
]

menuApi = Blueprint( 'menuApi', __name__ )
"#;

const HOME_BLOCK: &str = "menuItems = [\n    {\n        \"displayName\": \"Home\",\n        \"index\": 0,\n        \"route\": \"/\"\n    }\n]\n";

fn write_hand_edited(generator: &Generator) -> PathBuf {
    let path = generator.config().project_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, HAND_EDITED).unwrap();
    path
}

const EXPECTED_MODULES: &str =
    "listModules = [\n    testrun.role,\n    testrun.custom,  # kept by hand\n    testrun.user,\n    testrun.log\n]\n";

#[test]
fn indented_list_closer_in_sidecar_mode() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Sidecar));
    let path = write_hand_edited(&generator);

    let report = generator.update_project().unwrap();
    assert_eq!(
        report.modules,
        ["testrun.role", "testrun.custom", "testrun.user", "testrun.log"]
    );

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(EXPECTED_MODULES));
    assert!(text.contains(HOME_BLOCK));
    assert!(text.ends_with("]\n\nmenuApi = Blueprint( 'menuApi', __name__ )\n"));
}

#[test]
fn indented_list_closer_in_inline_mode() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Inline));
    let path = write_hand_edited(&generator);

    generator.update_project().unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(EXPECTED_MODULES));

    let tree = generator.menu_tree().unwrap();
    assert_eq!(tree.len(), 3);
    assert!(tree.iter().any(|n| n.caption == "Home" && n.route.as_deref() == Some("/")));
}

#[test]
fn legacy_import_marker_is_not_duplicated() {
    let dir = tempfile::TempDir::new().unwrap();
    let generator = Generator::new(config(dir.path(), MenuSchema::Sidecar));
    let path = write_hand_edited(&generator);

    let report = generator.update_project().unwrap();
    assert_eq!(report.imports_added.len(), 2);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("import testrun.role ").count(), 1);
    assert!(text.contains("import testrun.role   # import maintained by generator.py\n"));
    assert!(text.contains("import testrun.log   # import maintained by crudforge\n"));
}
