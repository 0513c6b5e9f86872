//! Coordinate translation from engine output to SVG space
//!
//! Engine coordinates are scaled to pixels and flipped so y grows downward.
//! Boxes keep the sizes computed by the geometry estimator; only their
//! centers come from the engine. Once every position is known, a margin pass
//! shifts the whole diagram so its content starts at the margin, and a final
//! inset makes room for the package frame and its title tab.

use log::{debug, warn};

use crate::model::NavLink;

use super::config::LayoutConfig;
use super::engine::EngineOutput;
use super::label;
use super::request::{EdgeRole, LayoutRequest, NodeRole};
use super::types::*;

/// Canvas used when there is nothing to measure
const EMPTY_CANVAS: (f64, f64) = (400.0, 300.0);

/// Build the final diagram layout from sized boxes and engine output
///
/// `links` must be the validated links the request was built from.
pub fn translate(
    mut boxes: Vec<BoxLayout>,
    links: &[NavLink],
    title: &str,
    request: &LayoutRequest,
    output: &EngineOutput,
    config: &LayoutConfig,
) -> DiagramLayout {
    let flip = Flip::new(output.height, config.scale);

    for node in &request.nodes {
        let NodeRole::Box(index) = node.role else {
            continue;
        };
        let Some(b) = boxes.get_mut(index) else {
            continue;
        };
        match output.nodes.get(&node.name) {
            Some(center) => {
                let center = flip.apply(*center);
                b.bounds.x = center.x - b.bounds.width / 2.0;
                b.bounds.y = center.y - b.bounds.height / 2.0;
            }
            None => warn!(node = node.name; "Layout engine did not place box"),
        }
    }

    let mut placed = Vec::with_capacity(links.len());
    for (index, link) in links.iter().enumerate() {
        let text = link.label_text();
        let (path, pinned) = match request.label_spacer(index) {
            Some(spacer) => {
                let first = routed(request, output, &flip, EdgeRole::ToSpacer(index));
                let second = routed(request, output, &flip, EdgeRole::FromSpacer(index));
                let anchor = output.nodes.get(&spacer.name).map(|p| flip.apply(*p));
                (join_halves(first, second), anchor)
            }
            None => (
                routed(request, output, &flip, EdgeRole::Direct(index)).unwrap_or_default(),
                None,
            ),
        };

        let is_routed = path.len() >= 2;
        if !is_routed {
            debug!(from = link.from.as_str(), to = link.to.as_str(), points = path.len(); "Degenerate link route");
        }

        // unrouted links are not drawn and carry no label
        let label = if text.is_empty() || !is_routed {
            None
        } else {
            Some(match pinned {
                Some(position) => LabelLayout {
                    text,
                    position,
                    anchor: TextAnchor::Middle,
                },
                None => LabelLayout {
                    position: label::place(&path, &text, &boxes, config),
                    text,
                    anchor: TextAnchor::Start,
                },
            })
        };

        placed.push(LinkLayout {
            from: link.from.clone(),
            to: link.to.clone(),
            kind: link.kind,
            path,
            label,
        });
    }

    let mut layout = DiagramLayout {
        boxes,
        links: placed,
        frame: FrameLayout {
            title: format!("pkg {}", title),
            bounds: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            tab_height: config.frame_tab_height,
        },
        width: 0.0,
        height: 0.0,
        metrics: config.metrics.clone(),
    };

    let (canvas_width, canvas_height) = apply_margin(&mut layout, config);
    apply_frame_inset(&mut layout, canvas_width, canvas_height, config);
    snap_endpoints(&mut layout);

    layout
}

/// Engine-to-SVG coordinate conversion for one run
struct Flip {
    canvas_height: f64,
    scale: f64,
}

impl Flip {
    fn new(engine_height: f64, scale: f64) -> Self {
        Self {
            canvas_height: engine_height * scale,
            scale,
        }
    }

    fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, self.canvas_height - p.y * self.scale)
    }
}

fn routed(
    request: &LayoutRequest,
    output: &EngineOutput,
    flip: &Flip,
    role: EdgeRole,
) -> Option<Vec<Point>> {
    let edge = request.edges.iter().find(|e| e.role == role)?;
    let routed = output.edges.get(&edge.id)?;
    Some(routed.points.iter().map(|p| flip.apply(*p)).collect())
}

/// Rebuild a route split at a label spacer, dropping the duplicated junction
fn join_halves(first: Option<Vec<Point>>, second: Option<Vec<Point>>) -> Vec<Point> {
    match (first, second) {
        (Some(mut first), Some(second)) if !first.is_empty() => {
            first.extend(second.into_iter().skip(1));
            first
        }
        (Some(first), None) => first,
        (_, Some(second)) => second,
        (None, None) => Vec::new(),
    }
}

/// Shift content so it starts at the margin; returns the canvas size
fn apply_margin(layout: &mut DiagramLayout, config: &LayoutConfig) -> (f64, f64) {
    let Some(extent) = content_extent(layout, config.icon_allowance) else {
        return EMPTY_CANVAS;
    };

    let dx = config.margin - extent.x;
    let dy = config.margin - extent.y;
    translate_content(layout, dx, dy);

    (
        extent.right() + dx + config.margin,
        extent.bottom() + dy + config.margin,
    )
}

/// Union of box extents (with icon room above each box), route points and label anchors
fn content_extent(layout: &DiagramLayout, icon_allowance: f64) -> Option<BoundingBox> {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut include = |p: Point| {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    };

    for b in &layout.boxes {
        include(Point::new(b.bounds.x, b.bounds.y - icon_allowance));
        include(Point::new(b.bounds.right(), b.bounds.bottom()));
    }
    for link in &layout.links {
        link.path.iter().copied().for_each(&mut include);
        if let Some(label) = &link.label {
            include(label.position);
        }
    }

    if min.x.is_finite() {
        Some(BoundingBox::from_edges(min.x, min.y, max.x, max.y))
    } else {
        None
    }
}

fn translate_content(layout: &mut DiagramLayout, dx: f64, dy: f64) {
    for b in &mut layout.boxes {
        b.bounds = b.bounds.translate(dx, dy);
    }
    for link in &mut layout.links {
        for p in &mut link.path {
            *p = p.translate(dx, dy);
        }
        if let Some(label) = &mut link.label {
            label.position = label.position.translate(dx, dy);
        }
    }
}

/// Move content below the frame tab and size the frame and the document
fn apply_frame_inset(
    layout: &mut DiagramLayout,
    canvas_width: f64,
    canvas_height: f64,
    config: &LayoutConfig,
) {
    let dx = config.frame_padding;
    let dy = config.frame_padding + config.frame_tab_height;
    translate_content(layout, dx, dy);

    layout.frame.bounds = BoundingBox::new(dx, dy, canvas_width, canvas_height);
    layout.width = canvas_width + config.frame_padding * 2.0;
    layout.height = canvas_height + config.frame_tab_height + config.frame_padding * 2.0;
}

/// Move each route's first and last point onto the nearest side of its box
fn snap_endpoints(layout: &mut DiagramLayout) {
    let DiagramLayout { boxes, links, .. } = layout;
    for link in links.iter_mut().filter(|l| l.is_routed()) {
        if let Some(from) = boxes.iter().find(|b| b.id == link.from) {
            link.path[0] = snap_to_side(link.path[0], &from.bounds);
        }
        if let Some(to) = boxes.iter().find(|b| b.id == link.to) {
            let last = link.path.len() - 1;
            link.path[last] = snap_to_side(link.path[last], &to.bounds);
        }
    }
}

fn snap_to_side(p: Point, bounds: &BoundingBox) -> Point {
    let top = (p.y - bounds.y).abs();
    let bottom = (p.y - bounds.bottom()).abs();
    let left = (p.x - bounds.x).abs();
    let right = (p.x - bounds.right()).abs();
    let nearest = top.min(bottom).min(left).min(right);

    if nearest == top {
        Point::new(p.x, bounds.y)
    } else if nearest == bottom {
        Point::new(p.x, bounds.bottom())
    } else if nearest == left {
        Point::new(bounds.x, p.y)
    } else {
        Point::new(bounds.right(), p.y)
    }
}
