//! ICG-EXPORT: Store to Spreadsheet / Configuration
//!
//! Two export surfaces over a [`CompatibilityStore`]:
//!
//! - a tabular grid in the same header/row shape the ingestor reads, with
//!   `"X"` marking every compatible build, so exporting and re-ingesting
//!   reproduces the same install codes;
//! - the configuration object, either as data or rendered as `config.js`.
//!
//! # Example
//!
//! ```ignore
//! use icg_export::{export_grid, grid_to_json};
//!
//! let grid = export_grid(&store);
//! std::fs::write(GRID_FILE_NAME, grid_to_json(&grid)?)?;
//! ```

pub mod renderer;

use chrono::Local;
use icg_core::{Cell, ConfigData, Dataset, Grid, Result, ADDON_TYPE, REQUIRED_TYPE};
use icg_store::{CompatibilityStore, KeyValueStore};
use renderer::{to_pretty_json, ConfigRenderer};

/// Canonical "compatible" marker written into build columns
pub const COMPATIBLE_MARKER: &str = "X";

/// Default file name for tabular exports
pub const GRID_FILE_NAME: &str = "install_codes.json";

/// Default file name for the rendered configuration
pub const CONFIG_FILE_NAME: &str = "config.js";

/// Header labels preceding the build columns
pub const HEADER_LABELS: [&str; 3] = ["Code", "Description", "Type"];

/// Tabular export of the store's dataset
pub fn export_grid<S: KeyValueStore>(store: &CompatibilityStore<S>) -> Grid {
    dataset_to_grid(store.dataset())
}

/// Tabular export of a dataset: one header row, one row per install code
pub fn dataset_to_grid(dataset: &Dataset) -> Grid {
    let mut header: Vec<Cell> = HEADER_LABELS.iter().map(|l| Cell::from(*l)).collect();
    header.extend(dataset.builds.iter().map(|b| Cell::from(b.as_str())));

    let mut grid = Vec::with_capacity(dataset.install_codes.len() + 1);
    grid.push(header);

    for code in &dataset.install_codes {
        let kind = if code.is_addon() { ADDON_TYPE } else { REQUIRED_TYPE };
        let mut row = vec![
            Cell::from(code.code.as_str()),
            Cell::from(code.description.as_str()),
            Cell::from(kind),
        ];
        row.extend(dataset.builds.iter().map(|build| {
            if code.is_compatible_with(build) {
                Cell::from(COMPATIBLE_MARKER)
            } else {
                Cell::from("")
            }
        }));
        grid.push(row);
    }

    grid
}

/// Configuration-object export
pub fn export_config<S: KeyValueStore>(store: &CompatibilityStore<S>) -> ConfigData {
    store.config_data()
}

/// Render a configuration as a `config.js` document
pub fn render_config_js(config: &ConfigData, generated_at: &str) -> Result<String> {
    ConfigRenderer::new()?.render(config, generated_at)
}

/// Render the store's configuration as `config.js`, stamped with local time
pub fn export_config_js<S: KeyValueStore>(store: &CompatibilityStore<S>) -> Result<String> {
    let generated_at = Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
    render_config_js(&export_config(store), &generated_at)
}

/// Serialize a grid as a JSON array of arrays
pub fn grid_to_json(grid: &Grid) -> Result<String> {
    to_pretty_json(grid)
}

/// Serialize a configuration object as plain JSON
pub fn config_to_json(config: &ConfigData) -> Result<String> {
    to_pretty_json(config)
}
