//! Data Model: InstallCode, Dataset, ConfigData, Selection, Notes
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCode {
    pub code: String,
    #[serde(default)]
    pub description: String,
    /// Builds this code applies to, in build-column order
    #[serde(rename = "compatibleBuilds", default)]
    pub compatible_builds: Vec<String>,
    /// Set only on an add-on's own identity row
    #[serde(rename = "forAddon", default, skip_serializing_if = "Option::is_none")]
    pub for_addon: Option<String>,
}

impl InstallCode {
    pub fn required(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            compatible_builds: Vec::new(),
            for_addon: None,
        }
    }

    /// Add-on row; the add-on is named after its code.
    pub fn addon(code: impl Into<String>, description: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            for_addon: Some(code.clone()),
            code,
            description: description.into(),
            compatible_builds: Vec::new(),
        }
    }

    pub fn with_builds<I, S>(mut self, builds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compatible_builds = builds.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_addon(&self) -> bool {
        self.for_addon.is_some()
    }

    pub fn is_compatible_with(&self, build: &str) -> bool {
        self.compatible_builds.iter().any(|b| b == build)
    }
}

/// The ingested dataset. Always replaced as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub builds: Vec<String>,
    pub install_codes: Vec<InstallCode>,
    pub addons: Vec<String>,
    pub addon_descriptions: BTreeMap<String, String>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty() && self.install_codes.is_empty() && self.addons.is_empty()
    }
}

/// Configuration document shape, used for bootstrap import and export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigData {
    #[serde(default)]
    pub builds: Vec<String>,
    #[serde(default)]
    pub install_codes: Vec<InstallCode>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_descriptions: Option<BTreeMap<String, String>>,
}

impl ConfigData {
    /// Convert to a dataset. Missing add-on descriptions are derived from
    /// the `forAddon` rows.
    pub fn into_dataset(self) -> Dataset {
        let addon_descriptions = match self.addon_descriptions {
            Some(descriptions) => descriptions,
            None => self
                .install_codes
                .iter()
                .filter_map(|code| {
                    code.for_addon
                        .as_ref()
                        .map(|addon| (addon.clone(), code.description.clone()))
                })
                .collect(),
        };

        Dataset {
            builds: self.builds,
            install_codes: self.install_codes,
            addons: self.addons,
            addon_descriptions,
        }
    }
}

impl From<&Dataset> for ConfigData {
    fn from(dataset: &Dataset) -> Self {
        Self {
            builds: dataset.builds.clone(),
            install_codes: dataset.install_codes.clone(),
            addons: dataset.addons.clone(),
            addon_descriptions: Some(dataset.addon_descriptions.clone()),
        }
    }
}

/// Current build and add-on selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub build: Option<String>,
    /// Distinct, in insertion order
    pub addons: Vec<String>,
}

impl Selection {
    /// Append an add-on unless already selected. Returns whether it was added.
    pub fn add_addon(&mut self, name: &str) -> bool {
        if self.addons.iter().any(|a| a == name) {
            return false;
        }
        self.addons.push(name.to_string());
        true
    }

    /// Drop an add-on, keeping the order of the rest. Returns whether it was present.
    pub fn remove_addon(&mut self, name: &str) -> bool {
        let before = self.addons.len();
        self.addons.retain(|a| a != name);
        self.addons.len() != before
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.addons.iter().any(|a| a == name)
    }

    pub fn clear(&mut self) {
        self.build = None;
        self.addons.clear();
    }
}

/// User-entered free text, keyed by build identifier or add-on name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    pub builds: BTreeMap<String, String>,
    pub addons: BTreeMap<String, String>,
}

/// Full store state used for persistence round-tripping. Notes travel
/// separately through their own persisted entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub dataset: Dataset,
    pub selection: Selection,
}
