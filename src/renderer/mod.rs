//! SVG renderer for navigation diagrams
//!
//! This module takes a DiagramLayout and produces an SVG string
//! with CSS classes for styling.

pub mod config;
mod icons;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, render_svg_with_stylesheet};
