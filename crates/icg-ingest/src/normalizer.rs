//! Cell normalization for ICG-INGEST.
//!
//! Spreadsheet input is permissive: anything meaningful in a build column
//! means "compatible". Only these read as "no":
//! - empty or missing cells
//! - `false` (any case)
//! - `0`
//! - `no` (any case)

use icg_core::{Cell, ADDON_TYPE};

/// Whether a build-column cell marks the row compatible with that build
pub fn is_compatible_marker(cell: &Cell) -> bool {
    if cell.is_empty() {
        return false;
    }

    let value = cell.trimmed();
    !(value.is_empty()
        || value.eq_ignore_ascii_case("false")
        || value == "0"
        || value.eq_ignore_ascii_case("no"))
}

/// Whether a Type cell marks an add-on row. Case-sensitive.
pub fn is_addon_type(type_text: &str) -> bool {
    type_text.trim() == ADDON_TYPE
}

/// Whether a header cell carries the given label, ignoring case and padding
pub fn header_matches(cell: &Cell, label: &str) -> bool {
    cell.trimmed().to_lowercase() == label
}
