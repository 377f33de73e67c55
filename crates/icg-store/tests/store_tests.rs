//! Integration tests for icg-store: bootstrap, snapshot round-trips and
//! persistence across store instances.

use icg_core::{Cell, ConfigData, InstallCode};
use icg_store::{keys, load_config, CompatibilityStore, DataSource, FileStore, KeyValueStore, MemoryStore};
use serde_json::json;

fn grid() -> Vec<Vec<Cell>> {
    serde_json::from_value(json!([
        ["Code", "Description", "Type", "24.1", "24.2"],
        ["ADDR1", "Home address fix", "Required", "X", ""],
        ["NET", "Network patch", "Required", "yes", "1"],
        ["PKG-A", "Premium package", "Add-On", "X", "X"]
    ]))
    .unwrap()
}

fn config() -> ConfigData {
    ConfigData {
        builds: vec!["9.0".into()],
        install_codes: vec![
            InstallCode::required("CFG", "from config").with_builds(["9.0"]),
            InstallCode::addon("CFG-ADDON", "config add-on").with_builds(["9.0"]),
        ],
        addons: vec!["CFG-ADDON".into()],
        addon_descriptions: None,
    }
}

/// Get the absolute path to a workspace fixture
fn fixture(path: &str) -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(path)
}

// =============================================================================
// Bootstrap
// =============================================================================

#[test]
fn test_load_empty_backend_without_config() {
    let store = CompatibilityStore::load(MemoryStore::new(), None);
    assert_eq!(store.source(), DataSource::Empty);
    assert!(store.dataset().is_empty());
}

#[test]
fn test_load_falls_back_to_config() {
    let store = CompatibilityStore::load(MemoryStore::new(), Some(config()));
    assert_eq!(store.source(), DataSource::Config);
    assert_eq!(store.builds(), ["9.0"]);
    // Derived from the forAddon row
    assert_eq!(store.addon_description("CFG-ADDON"), Some("config add-on"));
}

#[test]
fn test_persisted_dataset_wins_over_config() {
    let mut store = CompatibilityStore::new(MemoryStore::new());
    store.ingest_grid(&grid()).unwrap();
    let kv = store.into_backend();

    let store = CompatibilityStore::load(kv, Some(config()));
    assert_eq!(store.source(), DataSource::Persisted);
    assert_eq!(store.builds(), ["24.1", "24.2"]);
    assert!(store.last_updated().is_some());
}

#[test]
fn test_corrupt_dataset_falls_back_to_config() {
    let mut kv = MemoryStore::new();
    kv.set(keys::BUILD_DATA, "[\"1.0\"]").unwrap();
    kv.set(keys::INSTALL_CODES, "not json").unwrap();

    let mut store = CompatibilityStore::load(kv, Some(config()));
    assert_eq!(store.source(), DataSource::Config);
    assert_eq!(store.builds(), ["9.0"]);
    assert_eq!(store.take_warnings().len(), 1);
}

#[test]
fn test_corrupt_notes_reset_both_maps() {
    let mut kv = MemoryStore::new();
    kv.set(keys::BUILD_NOTES, "{\"1.0\": \"fine\"}").unwrap();
    kv.set(keys::ADDON_NOTES, "[broken").unwrap();

    let store = CompatibilityStore::load(kv, None);
    assert_eq!(store.build_note("1.0"), None);
    assert!(store.notes().addons.is_empty());
}

#[test]
fn test_missing_secondary_entries_default_to_empty() {
    let mut kv = MemoryStore::new();
    kv.set(keys::BUILD_DATA, "[\"1.0\"]").unwrap();

    let store = CompatibilityStore::load(kv, None);
    assert_eq!(store.source(), DataSource::Persisted);
    assert_eq!(store.builds(), ["1.0"]);
    assert!(store.install_codes().is_empty());
    assert!(store.addons().is_empty());
}

#[test]
fn test_yaml_config_fixture() {
    let config = load_config(fixture("testing/fixtures/grids/config_sample.yaml")).unwrap();
    let store = CompatibilityStore::load(MemoryStore::new(), Some(config));
    assert_eq!(store.required_codes_for("24.1.0").len(), 1);
    assert_eq!(store.addon_description("PKG-A"), Some("Premium package"));
}

// =============================================================================
// Snapshot / Restore
// =============================================================================

#[test]
fn test_snapshot_restore_roundtrip() {
    let mut original = CompatibilityStore::new(MemoryStore::new());
    original.ingest_grid(&grid()).unwrap();
    original.select_build("24.2");
    original.add_addon("PKG-A");

    let snapshot = original.snapshot();
    let mut restored = CompatibilityStore::new(MemoryStore::new());
    restored.restore(snapshot.clone());

    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(restored.builds(), original.builds());
    assert_eq!(restored.install_codes(), original.install_codes());
    assert_eq!(restored.addons(), original.addons());
    assert_eq!(restored.addon_description("PKG-A"), Some("Premium package"));
    assert_eq!(restored.selected_build(), Some("24.2"));
    assert_eq!(restored.selected_addons(), ["PKG-A"]);
}

#[test]
fn test_restore_reloads_notes_from_storage() {
    let mut kv = MemoryStore::new();
    kv.set(keys::BUILD_NOTES, "{\"24.1\": \"stored\"}").unwrap();

    let mut source = CompatibilityStore::new(MemoryStore::new());
    source.ingest_grid(&grid()).unwrap();

    let mut store = CompatibilityStore::new(kv);
    assert_eq!(store.build_note("24.1"), None);
    store.restore(source.snapshot());
    assert_eq!(store.build_note("24.1"), Some("stored"));
}

#[test]
fn test_snapshot_serializes() {
    let mut store = CompatibilityStore::new(MemoryStore::new());
    store.ingest_grid(&grid()).unwrap();
    let snapshot = store.snapshot();

    let text = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(serde_json::from_str::<icg_core::Snapshot>(&text).unwrap(), snapshot);
}

// =============================================================================
// File Backend
// =============================================================================

#[test]
fn test_file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = CompatibilityStore::load(FileStore::new(dir.path()), None);
        store.ingest_grid(&grid()).unwrap();
        store.set_build_note("24.1", "bench unit only");
        store.select_addon_with_note("PKG-A");
        assert!(store.take_warnings().is_empty());
    }

    let store = CompatibilityStore::load(FileStore::new(dir.path()), None);
    assert_eq!(store.source(), DataSource::Persisted);
    assert_eq!(store.addons(), ["PKG-A"]);
    assert_eq!(store.build_note("24.1"), Some("bench unit only"));
    assert_eq!(store.addon_note("PKG-A"), Some("Premium package"));
    // Selection is not persisted
    assert!(store.selected_addons().is_empty());
}

#[test]
fn test_file_backend_clear_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CompatibilityStore::load(FileStore::new(dir.path()), None);
    store.ingest_grid(&grid()).unwrap();
    store.set_addon_note("PKG-A", "note");
    store.clear_all().unwrap();

    let store = CompatibilityStore::load(FileStore::new(dir.path()), Some(config()));
    assert_eq!(store.source(), DataSource::Config);
    assert_eq!(store.addon_note("PKG-A"), Some("note"));
}
