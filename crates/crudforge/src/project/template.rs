//! Built-in project file used when none exists yet.

/// Marker comment appended to every import line the generator maintains.
pub const IMPORT_MARKER: &str = "# import maintained by crudforge";

/// Generates the starting `main.py` for an application.
///
/// It carries an import section plus empty `listModules` and `menuItems`
/// blocks for later runs to fill in.
pub fn generate_project_file(application: &str) -> String {
    format!(
        r#"import logging
from flask import Blueprint, jsonify

##
#   Section maintained by crudforge
##
listModules = [
]

menuItems = [
]

##
#   End of section maintained by crudforge
##
menuApi = Blueprint( 'menuApi', __name__ )
logger = logging.getLogger( '{app}' )


def registerApi( app, cors ):
    for module in listModules:
        module.registerApi( app, cors )

    app.register_blueprint( menuApi )
    return


@menuApi.route( "/api/menu", methods = [ 'GET' ] )
def getUserMenu():
    return jsonify( menuItems )
"#,
        app = application
    )
}

/// The import line maintained for one generated module.
pub fn import_line(module: &str) -> String {
    format!("import {}   {}", module, IMPORT_MARKER)
}

/// The re-export line added to a module package's `__init__.py`.
pub fn export_line(module: &str, stem: &str) -> String {
    format!("from {}.{} import *", module, stem)
}
