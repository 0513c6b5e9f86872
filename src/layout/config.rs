//! Configuration for the layout pipeline

use serde::Deserialize;

/// Text and box measurements shared by the geometry estimator and the renderer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoxMetrics {
    /// Font size for attribute lines
    pub font_size: f64,
    /// Font size for the `<<stereotype>>` tag
    pub font_size_stereotype: f64,
    /// Font size for the box name
    pub font_size_title: f64,
    pub box_min_width: f64,
    pub box_padding_x: f64,
    pub box_padding_y: f64,
    /// Height of the tag/name header, also the height of a box without attributes
    pub header_height: f64,
    pub attr_line_height: f64,
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_size_stereotype: 10.0,
            font_size_title: 13.0,
            box_min_width: 120.0,
            box_padding_x: 10.0,
            box_padding_y: 6.0,
            header_height: 40.0,
            attr_line_height: 18.0,
        }
    }
}

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub metrics: BoxMetrics,

    /// Pixels per layout-engine unit (Graphviz works in inches at 72 DPI)
    pub scale: f64,

    /// Empty space kept around the diagram content
    pub margin: f64,

    /// Room reserved above each box for its stereotype icon
    pub icon_allowance: f64,

    /// Gap between the canvas edge and the package frame
    pub frame_padding: f64,

    /// Height of the package frame's title tab
    pub frame_tab_height: f64,

    /// Size of the invisible node reserving space for a box icon (width, height)
    pub icon_spacer_size: (f64, f64),

    /// Estimated width of one label character
    pub label_char_width: f64,

    /// Height of a link label line
    pub label_height: f64,

    /// Horizontal separation between nodes, in engine units
    pub nodesep: f64,

    /// Vertical separation between ranks, in engine units
    pub ranksep: f64,

    /// Route labelled links through an invisible label node
    ///
    /// When disabled, labelled links are routed directly and their labels
    /// are positioned by the label placer instead.
    pub label_spacers: bool,

    /// Graphviz executable used by the default engine
    pub engine_command: String,

    /// Maximum time to wait for the layout engine, in milliseconds
    pub engine_timeout_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            metrics: BoxMetrics::default(),
            scale: 72.0,
            margin: 100.0,
            icon_allowance: 20.0,
            frame_padding: 15.0,
            frame_tab_height: 25.0,
            icon_spacer_size: (30.0, 25.0),
            label_char_width: 7.0,
            label_height: 18.0,
            nodesep: 1.0,
            ranksep: 1.2,
            label_spacers: true,
            engine_command: "dot".to_string(),
            engine_timeout_ms: 30_000,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pixel-per-engine-unit scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the margin around the diagram content
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable label spacer nodes
    pub fn with_label_spacers(mut self, enabled: bool) -> Self {
        self.label_spacers = enabled;
        self
    }

    /// Set the Graphviz executable
    pub fn with_engine_command(mut self, command: impl Into<String>) -> Self {
        self.engine_command = command.into();
        self
    }

    /// Set the layout engine timeout in milliseconds
    pub fn with_engine_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.engine_timeout_ms = timeout_ms;
        self
    }
}
