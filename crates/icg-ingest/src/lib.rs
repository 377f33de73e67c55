//! ICG-INGEST: Spreadsheet Grid to Compatibility Dataset
//!
//! Turns a rectangular grid of cells (header row plus data rows) into a
//! [`Dataset`]: build identifiers, install codes with their compatible
//! builds, and the add-ons declared by `Add-On` rows.
//!
//! # Example
//!
//! ```
//! use icg_ingest::{ingest, parse_grid_json};
//!
//! let grid = parse_grid_json(r#"[
//!     ["Code", "Description", "Type", "100.1"],
//!     ["ADDR1", "Home address fix", "Required", "X"],
//!     ["PKG-A", "Premium package", "Add-On", "X"]
//! ]"#).unwrap();
//!
//! let dataset = ingest(&grid).unwrap();
//! assert_eq!(dataset.builds, vec!["100.1"]);
//! assert_eq!(dataset.addons, vec!["PKG-A"]);
//! ```

pub mod header;
pub mod normalizer;

use header::HeaderLayout;
use icg_core::{cell_at, Cell, Dataset, IcgError, InstallCode, Result};
pub use icg_core::Grid;
use std::collections::BTreeMap;
use tracing::debug;

/// Grids with fewer rows than this are rejected as malformed
pub const MIN_ROWS: usize = 3;

/// Ingest a grid. On error nothing is produced, so callers keep their
/// previous state.
pub fn ingest(grid: &[Vec<Cell>]) -> Result<Dataset> {
    if grid.len() < MIN_ROWS {
        return Err(IcgError::format("Invalid spreadsheet format. Not enough rows."));
    }

    let layout = HeaderLayout::detect(&grid[0])?;

    let mut install_codes = Vec::new();
    let mut addons: Vec<String> = Vec::new();
    let mut addon_descriptions = BTreeMap::new();
    let mut skipped = 0usize;

    for row in &grid[1..] {
        let Some(code) = read_row(row, &layout, &mut addons, &mut addon_descriptions) else {
            skipped += 1;
            continue;
        };
        install_codes.push(code);
    }

    debug!(
        builds = layout.builds.len(),
        codes = install_codes.len(),
        addons = addons.len(),
        skipped,
        "grid ingested"
    );

    Ok(Dataset {
        builds: layout.build_names(),
        install_codes,
        addons,
        addon_descriptions,
    })
}

/// Build the install code for one data row. Rows without a code are skipped.
fn read_row(
    row: &[Cell],
    layout: &HeaderLayout,
    addons: &mut Vec<String>,
    addon_descriptions: &mut BTreeMap<String, String>,
) -> Option<InstallCode> {
    let code = cell_at(row, layout.code).trimmed();
    if code.is_empty() {
        return None;
    }

    let description = cell_at(row, layout.description).trimmed();
    let kind = cell_at(row, layout.kind).trimmed();

    let for_addon = normalizer::is_addon_type(&kind).then(|| code.clone());
    if let Some(addon) = &for_addon {
        if !addons.contains(addon) {
            addons.push(addon.clone());
        }
        // Later duplicate rows win
        addon_descriptions.insert(addon.clone(), description.clone());
    }

    let compatible_builds = layout
        .builds
        .iter()
        .filter(|b| normalizer::is_compatible_marker(cell_at(row, b.column)))
        .map(|b| b.build.clone())
        .collect();

    Some(InstallCode {
        code,
        description,
        compatible_builds,
        for_addon,
    })
}

/// Parse a grid from a JSON array of arrays, the shape a sheet-to-array
/// conversion emits.
pub fn parse_grid_json(text: &str) -> Result<Grid> {
    let grid: Grid = serde_json::from_str(text)?;
    Ok(grid)
}
