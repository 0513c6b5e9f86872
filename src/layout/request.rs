//! Layout requests for the external layout engine
//!
//! Every box becomes a fixed-size node. Two kinds of invisible spacer nodes
//! reserve room for decorations the engine knows nothing about:
//!
//! - an icon spacer per box, tied to its box by a heavy invisible edge, so
//!   neighbouring nodes keep clear of the icon drawn outside the box border;
//! - a label spacer per labelled link, which the link is routed through as
//!   two edges (`source -> spacer`, `spacer -> target`), so the engine leaves
//!   room for the label text.
//!
//! Node and edge order follow model order, so identical models produce
//! identical requests.

use std::collections::HashSet;

use crate::model::NavLink;

use super::config::LayoutConfig;
use super::types::BoxLayout;

/// Weight of the edge tying an icon spacer to its box
const ICON_EDGE_WEIGHT: u32 = 100;

/// What a request node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// A diagram box, by index into the box list
    Box(usize),
    /// The icon spacer owned by the box at this index
    IconSpacer(usize),
    /// The label spacer of the link at this index
    LabelSpacer(usize),
}

/// A fixed-size node, sized in engine units
#[derive(Debug, Clone, PartialEq)]
pub struct RequestNode {
    pub name: String,
    pub role: NodeRole,
    pub width: f64,
    pub height: f64,
}

impl RequestNode {
    pub fn is_visible(&self) -> bool {
        matches!(self.role, NodeRole::Box(_))
    }
}

/// Which logical link (or box) a request edge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    /// Invisible edge tying the icon spacer to the box at this index
    IconAnchor(usize),
    /// The whole route of the link at this index
    Direct(usize),
    /// First half of a split link: source to label spacer
    ToSpacer(usize),
    /// Second half of a split link: label spacer to target
    FromSpacer(usize),
}

/// A directed edge with an opaque identifier
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEdge {
    pub id: String,
    pub tail: String,
    pub head: String,
    pub role: EdgeRole,
}

/// Graph description handed to the layout engine
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    pub nodes: Vec<RequestNode>,
    pub edges: Vec<RequestEdge>,
    pub nodesep: f64,
    pub ranksep: f64,
}

impl LayoutRequest {
    pub fn node(&self, name: &str) -> Option<&RequestNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn edge(&self, id: &str) -> Option<&RequestEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Name of the label spacer of a link, if the link was split
    pub fn label_spacer(&self, link_index: usize) -> Option<&RequestNode> {
        self.nodes
            .iter()
            .find(|n| n.role == NodeRole::LabelSpacer(link_index))
    }

    /// Serialize the request as a Graphviz DOT digraph
    pub fn to_dot(&self) -> String {
        let mut lines = vec![
            "digraph G {".to_string(),
            "  rankdir=TB;".to_string(),
            "  splines=polyline;".to_string(),
            format!("  nodesep={};", self.nodesep),
            format!("  ranksep={};", self.ranksep),
            "  node [shape=box];".to_string(),
            String::new(),
        ];

        for node in &self.nodes {
            let style = if node.is_visible() { "" } else { ", style=invis" };
            lines.push(format!(
                "  {} [width={:.2}, height={:.2}, fixedsize=true{}];",
                quote(&node.name),
                node.width,
                node.height,
                style
            ));
        }

        lines.push(String::new());

        for edge in &self.edges {
            let attrs = match edge.role {
                EdgeRole::IconAnchor(_) => {
                    format!(r#"id="{}", style=invis, weight={}"#, edge.id, ICON_EDGE_WEIGHT)
                }
                EdgeRole::ToSpacer(_) => format!(r#"id="{}", arrowhead=none"#, edge.id),
                EdgeRole::Direct(_) | EdgeRole::FromSpacer(_) => format!(r#"id="{}""#, edge.id),
            };
            lines.push(format!(
                "  {} -> {} [{}];",
                quote(&edge.tail),
                quote(&edge.head),
                attrs
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}

/// Build the layout request for sized boxes and validated links
///
/// Box sizes are converted from pixels to engine units by `config.scale`.
pub fn build(boxes: &[BoxLayout], links: &[NavLink], config: &LayoutConfig) -> LayoutRequest {
    let scale = config.scale;
    let mut taken: HashSet<String> = boxes.iter().map(|b| b.id.0.clone()).collect();
    let mut nodes = Vec::with_capacity(boxes.len() * 2 + links.len());
    let mut edges = Vec::with_capacity(boxes.len() + links.len() * 2);

    let (icon_w, icon_h) = config.icon_spacer_size;
    let mut icon_names = Vec::with_capacity(boxes.len());
    for (index, b) in boxes.iter().enumerate() {
        nodes.push(RequestNode {
            name: b.id.0.clone(),
            role: NodeRole::Box(index),
            width: b.bounds.width / scale,
            height: b.bounds.height / scale,
        });
        let icon_name = unique_name(format!("{}::icon", b.id), &mut taken);
        nodes.push(RequestNode {
            name: icon_name.clone(),
            role: NodeRole::IconSpacer(index),
            width: icon_w / scale,
            height: icon_h / scale,
        });
        icon_names.push(icon_name);
    }

    let mut spacer_names = vec![None; links.len()];
    if config.label_spacers {
        for (index, link) in links.iter().enumerate() {
            let text = link.label_text();
            if text.is_empty() {
                continue;
            }
            let name = unique_name(format!("::label::e{}", index), &mut taken);
            let width = text.chars().count() as f64 * config.label_char_width + 10.0;
            nodes.push(RequestNode {
                name: name.clone(),
                role: NodeRole::LabelSpacer(index),
                width: width / scale,
                height: config.label_height / scale,
            });
            spacer_names[index] = Some(name);
        }
    }

    for (index, (b, icon_name)) in boxes.iter().zip(&icon_names).enumerate() {
        edges.push(RequestEdge {
            id: format!("icon{}", index),
            tail: icon_name.clone(),
            head: b.id.0.clone(),
            role: EdgeRole::IconAnchor(index),
        });
    }

    for (index, link) in links.iter().enumerate() {
        match &spacer_names[index] {
            Some(spacer) => {
                edges.push(RequestEdge {
                    id: format!("e{}a", index),
                    tail: link.from.0.clone(),
                    head: spacer.clone(),
                    role: EdgeRole::ToSpacer(index),
                });
                edges.push(RequestEdge {
                    id: format!("e{}b", index),
                    tail: spacer.clone(),
                    head: link.to.0.clone(),
                    role: EdgeRole::FromSpacer(index),
                });
            }
            None => edges.push(RequestEdge {
                id: format!("e{}", index),
                tail: link.from.0.clone(),
                head: link.to.0.clone(),
                role: EdgeRole::Direct(index),
            }),
        }
    }

    LayoutRequest {
        nodes,
        edges,
        nodesep: config.nodesep,
        ranksep: config.ranksep,
    }
}

/// Pick `base`, or `base` with trailing apostrophes if a box already uses that name
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base;
    while taken.contains(&name) {
        name.push('\'');
    }
    taken.insert(name.clone());
    name
}

/// Quote a node name for DOT
fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
