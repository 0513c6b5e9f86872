//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use nav_diagram::layout::request::{EdgeRole, NodeRole, RequestEdge, RequestNode};
use nav_diagram::layout::{EngineOutput, LayoutEngine, LayoutError, LayoutRequest, Point, RoutedEdge};
use nav_diagram::{load_model, NavModel};

/// Deterministic stand-in for Graphviz
///
/// Boxes are stacked top to bottom in request order, each with its icon
/// spacer above its top-right corner. Label spacers sit right of the box
/// column, level with the midpoint of the boxes they join. Edges are straight
/// segments leaving the tail's bottom (or top) and entering the head's top (or
/// bottom). All distances derive from node sizes, so the result scales with
/// the request.
pub struct StackEngine;

impl LayoutEngine for StackEngine {
    fn layout(&self, request: &LayoutRequest) -> Result<EngineOutput, LayoutError> {
        let column = max_width(request, |n| n.is_visible());
        let label_column = max_width(request, |n| matches!(n.role, NodeRole::LabelSpacer(_)));

        // y grows downward while placing; flipped to engine coordinates at the end
        let mut placed: HashMap<String, Point> = HashMap::new();
        let mut cursor = 0.0;
        for node in &request.nodes {
            let NodeRole::Box(index) = node.role else {
                continue;
            };
            let icon = request
                .nodes
                .iter()
                .find(|n| n.role == NodeRole::IconSpacer(index));
            let icon_height = icon.map_or(0.0, |n| n.height);
            let top = cursor + icon_height;
            placed.insert(node.name.clone(), Point::new(column / 2.0, top + node.height / 2.0));
            if let Some(icon) = icon {
                placed.insert(
                    icon.name.clone(),
                    Point::new(
                        column / 2.0 + node.width / 2.0 - icon.width / 2.0,
                        top - icon.height / 2.0,
                    ),
                );
            }
            cursor = top + node.height * 2.0;
        }

        for node in &request.nodes {
            let NodeRole::LabelSpacer(index) = node.role else {
                continue;
            };
            let tail = endpoint(request, EdgeRole::ToSpacer(index), |e| &e.tail);
            let head = endpoint(request, EdgeRole::FromSpacer(index), |e| &e.head);
            if let (Some(tail), Some(head)) = (tail.and_then(|t| placed.get(t)), head.and_then(|h| placed.get(h))) {
                let y = (tail.y + head.y) / 2.0;
                placed.insert(node.name.clone(), Point::new(column + node.width / 2.0, y));
            }
        }

        let height = cursor.max(1.0);
        let mut edges = HashMap::new();
        for edge in &request.edges {
            let (Some(tail), Some(head)) = (request.node(&edge.tail), request.node(&edge.head)) else {
                continue;
            };
            let (Some(&tail_center), Some(&head_center)) = (placed.get(&tail.name), placed.get(&head.name)) else {
                continue;
            };
            let points = vec![
                port(tail, tail_center, head_center),
                port(head, head_center, tail_center),
            ];
            edges.insert(
                edge.id.clone(),
                RoutedEdge {
                    points: points.into_iter().map(|p| flip(p, height)).collect(),
                },
            );
        }

        Ok(EngineOutput {
            width: column + label_column,
            height,
            nodes: placed.into_iter().map(|(name, p)| (name, flip(p, height))).collect(),
            edges,
        })
    }
}

fn max_width(request: &LayoutRequest, filter: impl Fn(&RequestNode) -> bool) -> f64 {
    request
        .nodes
        .iter()
        .filter(|n| filter(n))
        .map(|n| n.width)
        .fold(0.0, f64::max)
}

fn endpoint<'a>(
    request: &'a LayoutRequest,
    role: EdgeRole,
    pick: impl Fn(&'a RequestEdge) -> &'a String,
) -> Option<&'a String> {
    request.edges.iter().find(|e| e.role == role).map(pick)
}

/// Where an edge attaches to `node`: the side facing `other` for boxes, the center for spacers
fn port(node: &RequestNode, center: Point, other: Point) -> Point {
    if !node.is_visible() {
        return center;
    }
    if other.y >= center.y {
        Point::new(center.x, center.y + node.height / 2.0)
    } else {
        Point::new(center.x, center.y - node.height / 2.0)
    }
}

fn flip(p: Point, height: f64) -> Point {
    Point::new(p.x, height - p.y)
}

/// Login page (the entry point) linked to the main menu
pub const LOGIN_MENU: &str = r#"
name: Shop
entryPoint: Login
pages:
  Login:
menus:
  Menu:
links:
  - { from: Login, to: Menu }
"#;

pub fn login_menu() -> NavModel {
    load_model(LOGIN_MENU).expect("fixture should load")
}

/// Compare floats produced by scaling round trips
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
