//! ICG CLI: terminal front end over a directory-backed store
pub mod handlers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icg_store::{load_config, CompatibilityStore, FileStore};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "icg")]
#[command(author, version, about = "Install code lookup by build and add-on", long_about = None)]
pub struct Cli {
    /// Directory holding the saved data
    #[arg(long, env = "ICG_DATA_DIR", default_value = ".icg", global = true)]
    pub data_dir: PathBuf,

    /// Configuration document used when no data has been saved yet (JSON or YAML)
    #[arg(long, env = "ICG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a spreadsheet grid (JSON array of rows) and save it
    Ingest {
        /// Path to the grid file
        grid: PathBuf,
    },
    /// Replace the saved data with a configuration document
    ImportConfig {
        /// Path to the configuration file (JSON or YAML)
        path: PathBuf,
    },
    /// Show what is loaded and when it was saved
    Status,
    /// List build identifiers
    Builds {
        /// Only builds whose identifier contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List add-ons
    Addons {
        /// Only add-ons whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show required codes for a build and the selected add-ons
    Show {
        /// Build identifier
        build: String,
        /// Add-on to include (repeatable)
        #[arg(short, long = "addon")]
        addons: Vec<String>,
        /// Only required codes whose code or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Save a note for a build
    NoteBuild { build: String, text: String },
    /// Save a note for an add-on
    NoteAddon { addon: String, text: String },
    /// Export the data as a grid the ingest command accepts
    ExportGrid {
        /// Output path
        #[arg(default_value = icg_export::GRID_FILE_NAME)]
        out: PathBuf,
    },
    /// Export the configuration object (`.js` renders config.js, otherwise JSON)
    ExportConfig {
        /// Output path
        #[arg(default_value = icg_export::CONFIG_FILE_NAME)]
        out: PathBuf,
    },
    /// Delete the saved data (notes are kept)
    Clear,
}

/// Open the store for a CLI invocation
pub fn open_store(cli: &Cli) -> Result<CompatibilityStore<FileStore>> {
    let fallback = match &cli.config {
        Some(path) => Some(
            load_config(path).with_context(|| format!("loading configuration {}", path.display()))?,
        ),
        None => None,
    };
    Ok(CompatibilityStore::load(FileStore::new(&cli.data_dir), fallback))
}

/// Run one command. Persistence warnings go to `err`, results to `out`.
pub fn run(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    let mut store = open_store(&cli)?;

    let result = match cli.command {
        Commands::Ingest { grid } => handlers::ingest(&mut store, &grid, out),
        Commands::ImportConfig { path } => handlers::import_config(&mut store, &path, out),
        Commands::Status => handlers::status(&store, out),
        Commands::Builds { search } => handlers::builds(&store, search.as_deref(), out),
        Commands::Addons { search } => handlers::addons(&store, search.as_deref(), out),
        Commands::Show { build, addons, search } => {
            handlers::show(&mut store, &build, &addons, search.as_deref(), out)
        }
        Commands::NoteBuild { build, text } => handlers::note_build(&mut store, &build, &text, out),
        Commands::NoteAddon { addon, text } => handlers::note_addon(&mut store, &addon, &text, out),
        Commands::ExportGrid { out: path } => handlers::export_grid(&store, &path, out),
        Commands::ExportConfig { out: path } => handlers::export_config(&store, &path, out),
        Commands::Clear => handlers::clear(&mut store, out),
    };

    for warning in store.take_warnings() {
        writeln!(err, "warning: {}", warning)?;
    }

    result
}
