//! Configuration for SVG rendering

use serde::Deserialize;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names and marker ids (e.g., "nav-" for "nav-box")
    pub class_prefix: Option<String>,

    pub font_family: String,

    /// Font size for link labels
    pub label_font_size: f64,

    /// Font size for the package frame title
    pub frame_font_size: f64,

    /// Stroke color for boxes, links and glyphs
    pub line_color: String,

    /// Stroke width for links
    pub line_width: f64,

    /// Edge length of the stereotype icon
    pub icon_size: f64,

    /// Radius of the entry marker's circle
    pub entry_circle_radius: f64,

    /// Edge length of the entry marker's square
    pub entry_square_size: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("nav-".to_string()),
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            label_font_size: 11.0,
            frame_font_size: 12.0,
            line_color: "#000000".to_string(),
            line_width: 1.2,
            icon_size: 14.0,
            entry_circle_radius: 5.0,
            entry_square_size: 8.0,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set the font family used for all text
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the stroke color
    pub fn with_line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = color.into();
        self
    }
}
