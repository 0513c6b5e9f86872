//! Stereotype icon glyphs
//!
//! Each icon is a white square of edge `size` at `(x, y)` with a glyph
//! drawn inside it.

use crate::layout::Point;
use crate::model::Stereotype;

use super::svg::{escape_attr, fmt_number, SvgBuilder};

/// Draw the icon for `stereotype` with its top-left corner at `(x, y)`
pub fn stereotype_icon(builder: &mut SvgBuilder, stereotype: Stereotype, x: f64, y: f64, size: f64) {
    let stroke = escape_attr(&builder.config().line_color);
    let frame_width = if stereotype == Stereotype::NavigationClass {
        1.2
    } else {
        1.0
    };
    builder.add_rect(
        x,
        y,
        size,
        size,
        &format!(
            r#" fill="white" stroke="{}" stroke-width="{}""#,
            stroke,
            fmt_number(frame_width)
        ),
    );

    let glyph = format!(r#" fill="none" stroke="{}" stroke-width="1.5""#, stroke);
    let s = size;
    match stereotype {
        Stereotype::NavigationClass => {}
        Stereotype::Menu | Stereotype::Index => {
            // three horizontal bars
            let gap = s / 4.0;
            for i in 0..3 {
                let ly = y + gap * (i as f64 + 0.75);
                builder.add_line(x + 2.0, ly, x + s - 2.0, ly, &glyph);
            }
        }
        Stereotype::Query => {
            builder.add_text(
                "?",
                x + s / 2.0,
                y + s * 0.75,
                None,
                &format!(
                    r#" text-anchor="middle" font-size="{}" font-weight="bold""#,
                    fmt_number(s * 0.8)
                ),
            );
        }
        Stereotype::ProcessClass => {
            chevron(builder, x + 2.0, x + s / 2.0, y, s, &glyph);
            chevron(builder, x + s / 2.0, x + s - 2.0, y, s, &glyph);
        }
        Stereotype::GuidedTour => {
            builder.add_line(x + 2.0, y + s / 2.0, x + s - 5.0, y + s / 2.0, &glyph);
            chevron(builder, x + s - 8.0, x + s - 4.0, y, s, &glyph);
            builder.add_line(x + s - 2.0, y + s * 0.25, x + s - 2.0, y + s * 0.75, &glyph);
        }
        Stereotype::ExternalNode => {
            builder.add_line(x + 3.0, y + s / 2.0, x + s - 3.0, y + s / 2.0, &glyph);
            chevron(builder, x + s - 6.0, x + s - 2.0, y, s, &glyph);
        }
    }
}

/// Right-pointing chevron from `left` to the tip at `tip`, centered vertically in the icon
fn chevron(builder: &mut SvgBuilder, left: f64, tip: f64, y: f64, size: f64, attrs: &str) {
    builder.add_path(
        &[
            Point::new(left, y + size * 0.2),
            Point::new(tip, y + size / 2.0),
            Point::new(left, y + size * 0.8),
        ],
        attrs,
    );
}
