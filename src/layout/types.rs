//! Core types for the layout pipeline

use crate::model::{Identifier, LinkKind, NavBox, Stereotype};

use super::config::BoxMetrics;

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move the point by a fixed offset
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this bounding box intersects another (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow the box by `amount` on every side
    pub fn padded(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Horizontal alignment of a text label relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

/// A link label and where it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub text: String,
    pub position: Point,
    pub anchor: TextAnchor,
}

/// A positioned box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub id: Identifier,
    pub name: String,
    pub stereotype: Stereotype,
    pub attributes: Vec<String>,
    pub is_entry: bool,
    pub is_landmark: bool,
    pub bounds: BoundingBox,
}

impl BoxLayout {
    /// A box at the origin with its estimated size
    pub fn sized(nav_box: &NavBox, width: f64, height: f64) -> Self {
        Self {
            id: nav_box.id.clone(),
            name: nav_box.name.clone(),
            stereotype: nav_box.stereotype,
            attributes: nav_box.attributes.clone(),
            is_entry: nav_box.is_entry,
            is_landmark: nav_box.is_landmark,
            bounds: BoundingBox::new(0.0, 0.0, width, height),
        }
    }

    pub fn id_str(&self) -> &str {
        self.id.as_str()
    }
}

/// A routed link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkLayout {
    pub from: Identifier,
    pub to: Identifier,
    pub kind: LinkKind,
    /// Polyline vertices; fewer than two points means the link could not be routed
    pub path: Vec<Point>,
    pub label: Option<LabelLayout>,
}

impl LinkLayout {
    pub fn is_routed(&self) -> bool {
        self.path.len() >= 2
    }
}

/// The UML package frame enclosing the diagram
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    /// Text shown in the frame's tab, e.g. `pkg Shop`
    pub title: String,
    /// Body rectangle (below the tab)
    pub bounds: BoundingBox,
    pub tab_height: f64,
}

/// The complete result of layout computation, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    pub boxes: Vec<BoxLayout>,
    pub links: Vec<LinkLayout>,
    pub frame: FrameLayout,
    /// Total SVG width including the frame
    pub width: f64,
    /// Total SVG height including the frame
    pub height: f64,
    pub metrics: BoxMetrics,
}

impl DiagramLayout {
    pub fn get_box(&self, id: &Identifier) -> Option<&BoxLayout> {
        self.boxes.iter().find(|b| &b.id == id)
    }
}
