//! Compatibility Store
//!
//! Owns the ingested dataset, the current selection and the user notes.
//! The dataset is always swapped as one unit: a new one is fully built
//! before it replaces the old one, so a failed ingestion leaves the store
//! untouched.
//!
//! Persistence writes are best-effort. A failed write is logged and queued
//! as a warning for the caller (see [`CompatibilityStore::take_warnings`]);
//! only [`CompatibilityStore::clear_all`] reports storage failures as errors.

use chrono::Local;
use icg_core::{Cell, ConfigData, Dataset, IcgError, InstallCode, Notes, Result, Selection, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::persistence::{keys, read_json, write_json, KeyValueStore};

/// Format of the `lastUpdated` entry
const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Where the current dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Nothing loaded yet
    Empty,
    /// Restored from persisted entries
    Persisted,
    /// Loaded from a configuration document
    Config,
    /// Ingested from a spreadsheet grid
    Spreadsheet,
}

/// Summary for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub source: DataSource,
    pub builds: usize,
    pub install_codes: usize,
    pub addons: usize,
    pub last_updated: Option<String>,
}

pub struct CompatibilityStore<S: KeyValueStore> {
    kv: S,
    dataset: Dataset,
    selection: Selection,
    notes: Notes,
    source: DataSource,
    last_updated: Option<String>,
    warnings: Vec<IcgError>,
}

impl<S: KeyValueStore> CompatibilityStore<S> {
    /// Empty store over a backend. Nothing is read.
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            dataset: Dataset::default(),
            selection: Selection::default(),
            notes: Notes::default(),
            source: DataSource::Empty,
            last_updated: None,
            warnings: Vec::new(),
        }
    }

    /// Bootstrap from the backend, falling back to a configuration document
    /// when no dataset has been persisted or the persisted one is unreadable.
    pub fn load(kv: S, fallback: Option<ConfigData>) -> Self {
        let mut store = Self::new(kv);
        store.reload_notes();

        let has_persisted = match store.kv.get(keys::BUILD_DATA) {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                warn!(error = %e, "could not probe persisted dataset");
                store.warnings.push(e);
                false
            }
        };

        if has_persisted {
            match store.read_persisted_dataset() {
                Ok(dataset) => {
                    store.dataset = dataset;
                    store.source = DataSource::Persisted;
                    store.last_updated = read_json(&store.kv, keys::LAST_UPDATED).ok().flatten();
                    info!(builds = store.dataset.builds.len(), "dataset restored from storage");
                    return store;
                }
                Err(e) => {
                    warn!(error = %e, "persisted dataset unreadable, falling back to configuration");
                    store.warnings.push(e);
                }
            }
        }

        if let Some(config) = fallback {
            store.dataset = config.into_dataset();
            store.source = DataSource::Config;
            info!(builds = store.dataset.builds.len(), "dataset loaded from configuration");
        }

        store
    }

    // ------------------------------------------------------------------
    // Dataset replacement
    // ------------------------------------------------------------------

    /// Ingest a spreadsheet grid, replace the dataset and persist it.
    /// A format error leaves the store unchanged.
    pub fn ingest_grid(&mut self, grid: &[Vec<Cell>]) -> Result<&Dataset> {
        let dataset = icg_ingest::ingest(grid)?;
        self.replace_dataset(dataset, DataSource::Spreadsheet);
        self.save_dataset();
        Ok(&self.dataset)
    }

    /// Replace the dataset with a configuration document and persist it.
    pub fn apply_config(&mut self, config: ConfigData) {
        self.replace_dataset(config.into_dataset(), DataSource::Config);
        self.save_dataset();
    }

    fn replace_dataset(&mut self, dataset: Dataset, source: DataSource) {
        info!(
            builds = dataset.builds.len(),
            codes = dataset.install_codes.len(),
            addons = dataset.addons.len(),
            ?source,
            "dataset replaced"
        );
        self.dataset = dataset;
        self.source = source;
    }

    /// Write the dataset entries in order, then stamp `lastUpdated`.
    fn save_dataset(&mut self) {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let result = write_json(&mut self.kv, keys::BUILD_DATA, &self.dataset.builds)
            .and_then(|_| write_json(&mut self.kv, keys::INSTALL_CODES, &self.dataset.install_codes))
            .and_then(|_| write_json(&mut self.kv, keys::ADDON_DATA, &self.dataset.addons))
            .and_then(|_| {
                write_json(&mut self.kv, keys::ADDON_DESCRIPTIONS, &self.dataset.addon_descriptions)
            })
            .and_then(|_| write_json(&mut self.kv, keys::LAST_UPDATED, &stamp));

        match result {
            Ok(()) => {
                info!(%stamp, "dataset saved");
                self.last_updated = Some(stamp);
            }
            Err(e) => self.record_warning(e, "could not save dataset"),
        }
    }

    fn read_persisted_dataset(&self) -> Result<Dataset> {
        Ok(Dataset {
            builds: read_json(&self.kv, keys::BUILD_DATA)?.unwrap_or_default(),
            install_codes: read_json(&self.kv, keys::INSTALL_CODES)?.unwrap_or_default(),
            addons: read_json(&self.kv, keys::ADDON_DATA)?.unwrap_or_default(),
            addon_descriptions: read_json(&self.kv, keys::ADDON_DESCRIPTIONS)?.unwrap_or_default(),
        })
    }

    /// Reload both note maps. An unreadable entry empties both.
    fn reload_notes(&mut self) {
        let builds: Result<Option<BTreeMap<String, String>>> = read_json(&self.kv, keys::BUILD_NOTES);
        let addons: Result<Option<BTreeMap<String, String>>> = read_json(&self.kv, keys::ADDON_NOTES);

        match (builds, addons) {
            (Ok(builds), Ok(addons)) => {
                self.notes = Notes {
                    builds: builds.unwrap_or_default(),
                    addons: addons.unwrap_or_default(),
                };
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "saved notes unreadable, starting without notes");
                self.notes = Notes::default();
                self.warnings.push(e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Required (non add-on) codes that list `build`, in ingestion order
    pub fn required_codes_for(&self, build: &str) -> Vec<&InstallCode> {
        self.dataset
            .install_codes
            .iter()
            .filter(|code| !code.is_addon() && code.is_compatible_with(build))
            .collect()
    }

    /// Required codes for `build` whose code or description contains
    /// `term`, ignoring case. An empty term keeps every code.
    pub fn required_codes_matching(&self, build: &str, term: &str) -> Vec<&InstallCode> {
        let needle = term.trim().to_lowercase();
        self.required_codes_for(build)
            .into_iter()
            .filter(|code| {
                needle.is_empty()
                    || code.code.to_lowercase().contains(&needle)
                    || code.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Builds whose identifier contains `term`, ignoring case
    pub fn search_builds(&self, term: &str) -> Vec<&str> {
        let needle = term.trim().to_lowercase();
        self.dataset
            .builds
            .iter()
            .filter(|build| build.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// An add-on's own install code row
    pub fn addon_code(&self, addon: &str) -> Option<&InstallCode> {
        self.dataset
            .install_codes
            .iter()
            .find(|code| code.for_addon.as_deref() == Some(addon))
    }

    /// Add-ons whose name or description contains `term`, ignoring case
    pub fn search_addons(&self, term: &str) -> Vec<&str> {
        let needle = term.trim().to_lowercase();
        self.dataset
            .addons
            .iter()
            .filter(|addon| {
                needle.is_empty()
                    || addon.to_lowercase().contains(&needle)
                    || self
                        .addon_description(addon)
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .map(String::as_str)
            .collect()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn builds(&self) -> &[String] {
        &self.dataset.builds
    }

    pub fn install_codes(&self) -> &[InstallCode] {
        &self.dataset.install_codes
    }

    pub fn addons(&self) -> &[String] {
        &self.dataset.addons
    }

    pub fn addon_description(&self, addon: &str) -> Option<&str> {
        self.dataset.addon_descriptions.get(addon).map(String::as_str)
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            source: self.source,
            builds: self.dataset.builds.len(),
            install_codes: self.dataset.install_codes.len(),
            addons: self.dataset.addons.len(),
            last_updated: self.last_updated.clone(),
        }
    }

    /// Configuration-object view of the dataset
    pub fn config_data(&self) -> ConfigData {
        ConfigData::from(&self.dataset)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Not validated against the build list
    pub fn select_build(&mut self, build: impl Into<String>) {
        self.selection.build = Some(build.into());
    }

    pub fn selected_build(&self) -> Option<&str> {
        self.selection.build.as_deref()
    }

    pub fn add_addon(&mut self, addon: &str) {
        self.selection.add_addon(addon);
    }

    pub fn remove_addon(&mut self, addon: &str) {
        self.selection.remove_addon(addon);
    }

    pub fn selected_addons(&self) -> &[String] {
        &self.selection.addons
    }

    pub fn reset_selection(&mut self) {
        self.selection.clear();
    }

    /// Select an add-on and return its effective note. The first time an
    /// add-on without a note is selected, its description becomes the note.
    pub fn select_addon_with_note(&mut self, addon: &str) -> Option<String> {
        self.add_addon(addon);

        let existing = self.notes.addons.get(addon).cloned();
        if let Some(note) = existing.as_ref().filter(|n| !n.is_empty()) {
            return Some(note.clone());
        }

        // Missing or blank notes are seeded from the description
        let Some(seed) = self
            .addon_description(addon)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
        else {
            return existing;
        };
        self.set_addon_note(addon, seed.clone());
        Some(seed)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    pub fn build_note(&self, build: &str) -> Option<&str> {
        self.notes.builds.get(build).map(String::as_str)
    }

    pub fn addon_note(&self, addon: &str) -> Option<&str> {
        self.notes.addons.get(addon).map(String::as_str)
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn set_build_note(&mut self, build: impl Into<String>, text: impl Into<String>) {
        self.notes.builds.insert(build.into(), text.into());
        if let Err(e) = write_json(&mut self.kv, keys::BUILD_NOTES, &self.notes.builds) {
            self.record_warning(e, "could not save build note");
        }
    }

    pub fn set_addon_note(&mut self, addon: impl Into<String>, text: impl Into<String>) {
        self.notes.addons.insert(addon.into(), text.into());
        if let Err(e) = write_json(&mut self.kv, keys::ADDON_NOTES, &self.notes.addons) {
            self.record_warning(e, "could not save add-on note");
        }
    }

    // ------------------------------------------------------------------
    // Snapshot / restore / clear
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            dataset: self.dataset.clone(),
            selection: self.selection.clone(),
        }
    }

    /// Replace dataset and selection wholesale. Notes are reloaded from
    /// their own persisted entries.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.replace_dataset(snapshot.dataset, DataSource::Persisted);
        self.selection = snapshot.selection;
        self.reload_notes();
    }

    /// Drop the dataset from memory and storage. Notes survive.
    ///
    /// Storage is cleared first, `buildData` last. If a removal fails the
    /// in-memory dataset is kept and `buildData` is still on disk, so the
    /// next `load` restores what is left instead of starting empty.
    pub fn clear_all(&mut self) -> Result<()> {
        for key in keys::CLEAR_ORDER {
            if let Err(e) = self.kv.remove(key) {
                error!(error = %e, "failed to clear saved data");
                return Err(IcgError::persistence(key, format!("Failed to clear saved data: {}", e)));
            }
        }

        self.dataset = Dataset::default();
        self.source = DataSource::Empty;
        self.last_updated = None;
        info!("saved data cleared");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Warnings / backend access
    // ------------------------------------------------------------------

    fn record_warning(&mut self, e: IcgError, context: &str) {
        warn!(error = %e, "{}", context);
        self.warnings.push(e);
    }

    /// Drain persistence warnings accumulated since the last call
    pub fn take_warnings(&mut self) -> Vec<IcgError> {
        std::mem::take(&mut self.warnings)
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    pub fn into_backend(self) -> S {
        self.kv
    }
}
