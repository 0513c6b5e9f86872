//! Stylesheet system for box fill colors
//!
//! Maps stereotype tags (`navigationclass`, `menu`, ...) to fill colors.
//! Stylesheets are TOML files with an optional `[metadata]` table and a
//! `[colors]` table; tags a stylesheet leaves out keep their default color.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Stereotype;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Key used for stereotypes without a color of their own
pub const FALLBACK_KEY: &str = "default";

/// Default fill colors, keyed by stereotype tag
const DEFAULT_PALETTE: [(&str, &str); 8] = [
    ("navigationclass", "#FFFFCC"),
    ("menu", "#FFFFCC"),
    ("index", "#CCFFCC"),
    ("query", "#CCFFCC"),
    ("processclass", "#FFCCCC"),
    ("guidedtour", "#E6E6FA"),
    ("externalnode", "#FFE4B5"),
    (FALLBACK_KEY, "#FFFFCC"),
];

/// A stylesheet mapping stereotype tags to fill colors
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: stereotype tag -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let mut stylesheet = Self::default();
        stylesheet.name = parsed.metadata.as_ref().and_then(|m| m.name.clone());
        stylesheet.description = parsed.metadata.as_ref().and_then(|m| m.description.clone());
        stylesheet.colors.extend(parsed.colors);
        Ok(stylesheet)
    }

    /// Look up the color for a tag
    pub fn resolve(&self, tag: &str) -> Option<&str> {
        self.colors.get(tag).map(|s| s.as_str())
    }

    /// Fill color for boxes of a stereotype
    ///
    /// Falls back to the `default` entry, then to the built-in default color.
    pub fn fill_for(&self, stereotype: Stereotype) -> &str {
        self.resolve(stereotype.as_str())
            .or_else(|| self.resolve(FALLBACK_KEY))
            .unwrap_or(DEFAULT_PALETTE[DEFAULT_PALETTE.len() - 1].1)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(tag, color)| (tag.to_string(), color.to_string()))
                .collect(),
        }
    }
}
