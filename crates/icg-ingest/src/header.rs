//! Header row detection.
//!
//! Row 0 must carry `Code`, `Description` and `Type` labels somewhere.
//! Every non-blank header cell after the `Type` column names a build.

use icg_core::{Cell, IcgError, Result};

use crate::normalizer::header_matches;

/// A build identifier and the grid column holding its compatibility flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildColumn {
    pub build: String,
    pub column: usize,
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub code: usize,
    pub description: usize,
    pub kind: usize,
    pub builds: Vec<BuildColumn>,
}

impl HeaderLayout {
    /// Resolve the layout of a header row
    pub fn detect(header: &[Cell]) -> Result<Self> {
        let find = |label: &str| header.iter().position(|cell| header_matches(cell, label));

        let (code, description, kind) = match (find("code"), find("description"), find("type")) {
            (Some(c), Some(d), Some(t)) => (c, d, t),
            _ => {
                return Err(IcgError::format(
                    "Required columns (Code, Description, Type) not found in the spreadsheet.",
                ))
            }
        };

        let builds: Vec<BuildColumn> = header
            .iter()
            .enumerate()
            .skip(kind + 1)
            .filter_map(|(column, cell)| {
                let build = cell.trimmed();
                (!build.is_empty()).then_some(BuildColumn { build, column })
            })
            .collect();

        if builds.is_empty() {
            return Err(IcgError::format("No build numbers found in the spreadsheet."));
        }

        Ok(Self {
            code,
            description,
            kind,
            builds,
        })
    }

    pub fn build_names(&self) -> Vec<String> {
        self.builds.iter().map(|b| b.build.clone()).collect()
    }
}
