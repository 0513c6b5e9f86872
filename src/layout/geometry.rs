//! Box size estimation from text content
//!
//! Text width is a linear function of character count and font size. It does
//! not match real glyph metrics; it only has to be monotonic and stable, since
//! the layout engine is told to treat the resulting sizes as fixed.

use crate::model::NavBox;

use super::config::BoxMetrics;

/// Average glyph width as a fraction of the font size
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Estimate the rendered width of `text` at `font_size`
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_FACTOR
}

/// Compute the (width, height) of a box from its tag, name and attributes
pub fn estimate(nav_box: &NavBox, metrics: &BoxMetrics) -> (f64, f64) {
    let tag_width = estimate_text_width(&nav_box.stereotype.label(), metrics.font_size_stereotype);
    let name_width = estimate_text_width(&nav_box.name, metrics.font_size_title);
    let content_width = nav_box
        .attributes
        .iter()
        .map(|attr| estimate_text_width(attr, metrics.font_size))
        .fold(tag_width.max(name_width), f64::max);

    let width = metrics
        .box_min_width
        .max(content_width + metrics.box_padding_x * 2.0);

    let mut height = metrics.header_height;
    if !nav_box.attributes.is_empty() {
        height +=
            nav_box.attributes.len() as f64 * metrics.attr_line_height + metrics.box_padding_y;
    }

    (width, height)
}
