//! Command handlers
use anyhow::{bail, Context, Result};
use icg_export::{config_to_json, export_config_js, grid_to_json};
use icg_ingest::parse_grid_json;
use icg_store::{load_config, CompatibilityStore, DataSource, KeyValueStore};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn ingest<S: KeyValueStore>(
    store: &mut CompatibilityStore<S>,
    path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    info!("Ingesting grid: {}", path.display());
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let grid = parse_grid_json(&text).with_context(|| format!("{} is not a grid", path.display()))?;

    // Format errors abort here with the previous data still in place
    let dataset = store.ingest_grid(&grid)?;
    writeln!(
        out,
        "Loaded {} builds, {} install codes, {} add-ons",
        dataset.builds.len(),
        dataset.install_codes.len(),
        dataset.addons.len()
    )?;
    Ok(())
}

pub fn import_config<S: KeyValueStore>(
    store: &mut CompatibilityStore<S>,
    path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let config = load_config(path).with_context(|| format!("loading configuration {}", path.display()))?;
    store.apply_config(config);
    writeln!(
        out,
        "Imported {} builds, {} install codes, {} add-ons",
        store.builds().len(),
        store.install_codes().len(),
        store.addons().len()
    )?;
    Ok(())
}

pub fn status<S: KeyValueStore>(store: &CompatibilityStore<S>, out: &mut dyn Write) -> Result<()> {
    let status = store.status();
    if status.source == DataSource::Empty {
        writeln!(out, "No data loaded. Ingest a spreadsheet grid to get started.")?;
        return Ok(());
    }

    writeln!(out, "Builds:        {}", status.builds)?;
    writeln!(out, "Install codes: {}", status.install_codes)?;
    writeln!(out, "Add-ons:       {}", status.addons)?;
    match status.last_updated {
        Some(stamp) => writeln!(out, "Using saved data from: {}", stamp)?,
        None => writeln!(out, "Source: {:?}", status.source)?,
    }
    Ok(())
}

pub fn builds<S: KeyValueStore>(
    store: &CompatibilityStore<S>,
    search: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let builds = store.search_builds(search.unwrap_or(""));
    if builds.is_empty() && search.is_some() {
        writeln!(out, "No builds found matching your search.")?;
    }
    for build in builds {
        match store.build_note(build) {
            Some(note) if !note.is_empty() => writeln!(out, "{}\t{}", build, note)?,
            _ => writeln!(out, "{}", build)?,
        }
    }
    Ok(())
}

pub fn addons<S: KeyValueStore>(
    store: &CompatibilityStore<S>,
    search: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    for addon in store.search_addons(search.unwrap_or("")) {
        writeln!(out, "{}\t{}", addon, store.addon_description(addon).unwrap_or(""))?;
    }
    Ok(())
}

pub fn show<S: KeyValueStore>(
    store: &mut CompatibilityStore<S>,
    build: &str,
    addons: &[String],
    search: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    store.reset_selection();
    store.select_build(build);

    writeln!(out, "Build {}", build)?;
    if let Some(note) = store.build_note(build).filter(|n| !n.is_empty()) {
        writeln!(out, "  Note: {}", note)?;
    }

    let required = store.required_codes_matching(build, search.unwrap_or(""));
    if required.is_empty() {
        match search {
            Some(_) => writeln!(out, "  No install codes found matching your search.")?,
            None => writeln!(out, "  No required install codes for this build.")?,
        }
    }
    for code in required {
        writeln!(out, "  {}\t{}", code.code, code.description)?;
    }

    if addons.is_empty() {
        return Ok(());
    }

    writeln!(out, "Add-ons")?;
    for addon in addons {
        let note = store.select_addon_with_note(addon);
        match store.addon_code(addon) {
            Some(code) => writeln!(out, "  {}\t{}", code.code, code.description)?,
            None => writeln!(out, "  {}\t(unknown add-on)", addon)?,
        }
        if let Some(note) = note.filter(|n| !n.is_empty()) {
            writeln!(out, "    Note: {}", note)?;
        }
    }
    Ok(())
}

pub fn note_build<S: KeyValueStore>(
    store: &mut CompatibilityStore<S>,
    build: &str,
    text: &str,
    out: &mut dyn Write,
) -> Result<()> {
    store.set_build_note(build, text);
    writeln!(out, "Saved note for build {}", build)?;
    Ok(())
}

pub fn note_addon<S: KeyValueStore>(
    store: &mut CompatibilityStore<S>,
    addon: &str,
    text: &str,
    out: &mut dyn Write,
) -> Result<()> {
    store.set_addon_note(addon, text);
    writeln!(out, "Saved note for add-on {}", addon)?;
    Ok(())
}

pub fn export_grid<S: KeyValueStore>(
    store: &CompatibilityStore<S>,
    path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    if store.builds().is_empty() {
        bail!("Nothing to export. Ingest a spreadsheet grid first.");
    }
    let grid = icg_export::export_grid(store);
    std::fs::write(path, grid_to_json(&grid)?).with_context(|| format!("writing {}", path.display()))?;
    writeln!(out, "Exported {} rows to {}", grid.len(), path.display())?;
    Ok(())
}

pub fn export_config<S: KeyValueStore>(
    store: &CompatibilityStore<S>,
    path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let is_js = path.extension().and_then(|e| e.to_str()) == Some("js");
    let body = if is_js {
        export_config_js(store)?
    } else {
        config_to_json(&icg_export::export_config(store))?
    };
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    writeln!(out, "Configuration written to {}", path.display())?;
    Ok(())
}

pub fn clear<S: KeyValueStore>(store: &mut CompatibilityStore<S>, out: &mut dyn Write) -> Result<()> {
    store.clear_all()?;
    writeln!(out, "Saved data cleared. Notes were kept.")?;
    Ok(())
}
