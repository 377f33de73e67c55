//! ICG Store: compatibility store, selection and persistence
pub mod config;
pub mod persistence;
pub mod store;

pub use config::{load_config, parse_config, ConfigFormat};
pub use persistence::{keys, FileStore, KeyValueStore, MemoryStore};
pub use store::{CompatibilityStore, DataSource, StoreStatus};
