//! crudforge CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crudforge::{Generator, GeneratorConfig, MenuNode, MenuSchema};

mod ui;

#[derive(Parser)]
#[command(name = "crudforge")]
#[command(about = "crudforge - keep generated module registries and menus in sync")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update imports, module list and menu of the project file
    Update {
        /// Generator configuration file
        #[arg(short, long, default_value = "crudforge.json")]
        config: PathBuf,

        /// Do not write backup copies
        #[arg(long)]
        no_backup: bool,
    },

    /// Show the current menu tree
    Menu {
        /// Generator configuration file
        #[arg(short, long, default_value = "crudforge.json")]
        config: PathBuf,
    },

    /// Move the menu between the inline block and the sidecar document
    Migrate {
        /// Generator configuration file
        #[arg(short, long, default_value = "crudforge.json")]
        config: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// `menuItems = [...]` block in the project file (schema 1)
    Inline,
    /// Separate menu document (schema 2)
    Sidecar,
}

impl From<Format> for MenuSchema {
    fn from(format: Format) -> Self {
        match format {
            Format::Inline => MenuSchema::Inline,
            Format::Sidecar => MenuSchema::Sidecar,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Update { config, no_backup } => update_project(&config, no_backup)?,
        Commands::Menu { config } => show_menu(&config)?,
        Commands::Migrate { config, to } => migrate_menu(&config, to.into())?,
    }

    Ok(())
}

fn load_config(path: &Path) -> miette::Result<GeneratorConfig> {
    let config = GeneratorConfig::load(path).map_err(|e| {
        ui::error_header();
        miette::Report::from(e)
    })?;
    tracing::debug!(
        config = %path.display(),
        tables = config.tables.len(),
        schema = u8::from(config.menu_schema),
        "configuration loaded"
    );
    Ok(config)
}

/// Path relative to the working directory, for display.
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Run the project update and print a summary.
fn update_project(config_path: &Path, no_backup: bool) -> miette::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if no_backup {
        config.backup = false;
    }

    ui::print_compact_header(env!("CARGO_PKG_VERSION"));
    println!();

    let spinner = ui::spinner("Updating project file...");
    let generator = Generator::new(config);
    let report = match generator.update_project() {
        Ok(report) => report,
        Err(e) => {
            spinner.finish_and_clear();
            ui::error_header();
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    ui::success(&format!("Updated {}", display_path(&report.project_file)));
    if let Some(backup) = &report.backup {
        ui::dim(&format!("backup: {}", display_path(backup)));
    }
    if let Some(sidecar) = &report.sidecar {
        ui::info(&format!("Menu written to {}", display_path(sidecar)));
    }
    println!();

    ui::box_header("MODULES");
    ui::box_line("");
    for module in &report.modules {
        let marker = if report.imports_added.iter().any(|line| line.contains(&format!("import {} ", module))) {
            "new"
        } else {
            ""
        };
        ui::box_line(&format!(" {} {:40} {}", ui::symbols::TRIANGLE, module, marker));
    }
    ui::box_line("");
    ui::box_footer();
    println!();

    ui::info(&format!(
        "{} imports added {} {} modules {} {} menu entries",
        report.imports_added.len(),
        ui::symbols::DOT,
        report.modules.len(),
        ui::symbols::DOT,
        report.menu_nodes
    ));
    ui::timing("Done", start.elapsed().as_millis());
    println!();

    Ok(())
}

/// Print the menu tree.
fn show_menu(config_path: &Path) -> miette::Result<()> {
    let config = load_config(config_path)?;
    let schema = config.menu_schema;
    let generator = Generator::new(config);
    let tree = generator.menu_tree()?;

    let source = match schema {
        MenuSchema::Inline => display_path(&generator.config().project_path()),
        MenuSchema::Sidecar => display_path(&generator.config().sidecar_path()),
    };
    ui::tree_dir(&source);
    if tree.is_empty() {
        ui::dim("(no menu entries)");
    }
    print_nodes(&tree, 0);
    println!();

    Ok(())
}

fn print_nodes(nodes: &[MenuNode], depth: usize) {
    for (idx, node) in nodes.iter().enumerate() {
        let is_last = idx + 1 == nodes.len();
        ui::tree_item(depth, &node.caption, node.route.as_deref(), is_last);
        if let Some(children) = &node.children {
            print_nodes(children, depth + 1);
        }
    }
}

/// Move the menu to another format.
fn migrate_menu(config_path: &Path, target: MenuSchema) -> miette::Result<()> {
    let config = load_config(config_path)?;
    let current = config.menu_schema;
    let generator = Generator::new(config);

    let moved = generator.migrate(target).map_err(|e| {
        ui::error_header();
        miette::Report::from(e)
    })?;

    ui::success(&format!("Moved {} menu entries", moved));
    if current != target {
        println!();
        ui::box_header(&format!("{} What's Next", ui::symbols::ARROW));
        ui::box_line("");
        ui::box_line(&format!(
            "   Set \"menuSchema\": {} in {}",
            u8::from(target),
            display_path(config_path)
        ));
        ui::box_line("");
        ui::box_footer();
    }
    println!();

    Ok(())
}
