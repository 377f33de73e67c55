//! ICG Core: data model, cells and the unified error type
//!
//! Shared by the ingestor, the compatibility store and the exporters.

pub mod cell;
pub mod data_model;
pub mod error;

pub use cell::{cell_at, Cell, Grid};
pub use data_model::{ConfigData, Dataset, InstallCode, Notes, Selection, Snapshot};
pub use error::{IcgError, Result};

/// Type label that marks a spreadsheet row as an add-on row
pub const ADDON_TYPE: &str = "Add-On";

/// Type label written for build-requirement rows on export
pub const REQUIRED_TYPE: &str = "Required";
