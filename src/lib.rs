//! nav-diagram - render UWE navigation models to SVG
//!
//! This library loads a navigation model, hands its graph to Graphviz for
//! node placement and edge routing, and renders the result as SVG with UWE
//! stereotype notation.
//!
//! # Example
//!
//! ```no_run
//! use nav_diagram::render;
//!
//! let svg = render(r#"
//! name: Shop
//! entryPoint: Login
//! pages:
//!   Login:
//! menus:
//!   Menu:
//! links:
//!   - { from: Login, to: Menu }
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod renderer;
pub mod stylesheet;

pub use error::ModelError;
pub use layout::{GraphvizEngine, LayoutConfig, LayoutEngine, LayoutError, LinkWarning};
pub use model::{load_model, LinkKind, NavBox, NavLink, NavModel, Stereotype};
pub use renderer::{render_svg, render_svg_with_stylesheet, SvgConfig};
pub use stylesheet::Stylesheet;

use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The model document could not be loaded
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Layout failed, usually because the engine could not run
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Errors that can occur when loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// TOML layout of a configuration file
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    layout: LayoutConfig,
    svg: SvgConfig,
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for box fill colors
    pub stylesheet: Stylesheet,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `[layout]` and `[svg]` tables from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(Self {
            layout: file.layout,
            svg: file.svg,
            stylesheet: Stylesheet::default(),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for box colors
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }
}

/// A rendered document together with the links that had to be dropped
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub warnings: Vec<LinkWarning>,
}

/// Render a YAML model to SVG with default configuration
///
/// Requires Graphviz `dot` on the `PATH`.
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a YAML model to SVG with custom configuration
///
/// # Example
///
/// ```no_run
/// use nav_diagram::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_margin(40.0))
///     .with_svg(SvgConfig::default().with_pretty_print(false));
///
/// let svg = render_with_config("pages:\n  Home:\n", &config).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let model = load_model(source)?;
    let engine = GraphvizEngine::from_config(&config.layout);
    let rendered = render_model(&model, config, &engine)?;
    Ok(rendered.svg)
}

/// Render an already loaded model with the given layout engine
pub fn render_model(
    model: &NavModel,
    config: &RenderConfig,
    engine: &dyn LayoutEngine,
) -> Result<Rendered, RenderError> {
    let (diagram, warnings) = layout::compute(model, &config.layout, engine)?;
    let svg = render_svg_with_stylesheet(&diagram, &config.svg, &config.stylesheet);
    info!(bytes = svg.len(), warnings = warnings.len(); "Rendered SVG");
    Ok(Rendered { svg, warnings })
}
