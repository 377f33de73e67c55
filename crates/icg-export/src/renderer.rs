//! `config.js` rendering for ICG-EXPORT.
//!
//! Uses Handlebars for the document frame. The configuration body is
//! serialized straight from the struct so field order is kept
//! (builds, installCodes, addons, addonDescriptions).

use handlebars::{no_escape, Handlebars};
use icg_core::{ConfigData, IcgError, Result};
use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Serializer};

const CONFIG_JS_TEMPLATE: &str = "config_js";

const CONFIG_JS: &str = "// Install Code Generator - Configuration
// Generated on {{generated_at}}

const configData = {{config_json}};
";

/// Renderer for the JavaScript configuration document
pub struct ConfigRenderer<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> ConfigRenderer<'a> {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);
        handlebars
            .register_template_string(CONFIG_JS_TEMPLATE, CONFIG_JS)
            .map_err(|e| IcgError::Export(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// Render `const configData = {...};` with a generation header
    pub fn render(&self, config: &ConfigData, generated_at: &str) -> Result<String> {
        let data = json!({
            "generated_at": generated_at,
            "config_json": to_pretty_json(config)?,
        });
        self.handlebars
            .render(CONFIG_JS_TEMPLATE, &data)
            .map_err(|e| IcgError::Export(e.to_string()))
    }
}

/// Pretty-print JSON with 4-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
