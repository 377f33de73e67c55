//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcgError {
    /// Malformed spreadsheet grid. Ingestion aborted, prior state kept.
    #[error("FORMAT/{reason}")]
    Format { reason: String },

    /// Underlying key/value storage failed.
    #[error("PERSIST/{key}: {reason}")]
    Persistence { key: String, reason: String },

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("EXPORT/{0}")]
    Export(String),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}

impl IcgError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format { reason: reason.into() }
    }

    pub fn persistence(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Persistence {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, IcgError>;
