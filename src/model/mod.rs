//! In-memory navigation model
//!
//! Boxes (pages, menus, indexes, ...) and the directed links between them,
//! as loaded from a model document. The model only holds data; sizes and
//! positions are computed by the layout pipeline.

pub mod yaml;

use std::fmt;

use indexmap::IndexMap;

pub use yaml::load_model;

/// Unique name of a box, also used as its layout-engine node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a box in the navigation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stereotype {
    NavigationClass,
    Menu,
    Index,
    Query,
    ProcessClass,
    GuidedTour,
    ExternalNode,
}

impl Stereotype {
    /// Lowercase tag used in `<<tag>>` labels, palette keys and CSS classes
    pub fn as_str(&self) -> &'static str {
        match self {
            Stereotype::NavigationClass => "navigationclass",
            Stereotype::Menu => "menu",
            Stereotype::Index => "index",
            Stereotype::Query => "query",
            Stereotype::ProcessClass => "processclass",
            Stereotype::GuidedTour => "guidedtour",
            Stereotype::ExternalNode => "externalnode",
        }
    }

    /// The `<<tag>>` text drawn in the box header
    pub fn label(&self) -> String {
        format!("<<{}>>", self.as_str())
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a link between two boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkKind {
    #[default]
    Navigation,
    Containment,
    Process,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Navigation => "navigation",
            LinkKind::Containment => "containment",
            LinkKind::Process => "process",
        }
    }
}

/// A diagram node
#[derive(Debug, Clone, PartialEq)]
pub struct NavBox {
    pub id: Identifier,
    pub name: String,
    pub stereotype: Stereotype,
    /// Pre-formatted attribute lines, e.g. `- age : Integer`
    pub attributes: Vec<String>,
    pub is_entry: bool,
    pub is_landmark: bool,
}

impl NavBox {
    /// Create a box whose display name equals its identifier
    pub fn new(id: impl Into<String>, stereotype: Stereotype) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: Identifier(id),
            stereotype,
            attributes: vec![],
            is_entry: false,
            is_landmark: false,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_entry(mut self, is_entry: bool) -> Self {
        self.is_entry = is_entry;
        self
    }

    pub fn with_landmark(mut self, is_landmark: bool) -> Self {
        self.is_landmark = is_landmark;
        self
    }
}

/// A directed edge between two boxes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavLink {
    pub from: Identifier,
    pub to: Identifier,
    pub name: Option<String>,
    pub kind: LinkKind,
    pub condition: Option<String>,
}

impl NavLink {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Identifier::new(from),
            to: Identifier::new(to),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Text drawn next to the link; empty when the link carries no label
    pub fn label_text(&self) -> String {
        let mut parts = vec![];
        if self.kind == LinkKind::Process {
            parts.push("<<processlink>>".to_string());
        }
        if let Some(condition) = self.condition.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("{{{}}}", condition));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!("- {}", name));
        }
        parts.join(" ")
    }
}

/// Title used when the model document does not name the diagram
pub const DEFAULT_TITLE: &str = "Navigation Model";

/// A complete navigation model
#[derive(Debug, Clone, PartialEq)]
pub struct NavModel {
    pub title: String,
    /// Boxes keyed by identifier, in document order
    pub boxes: IndexMap<String, NavBox>,
    pub links: Vec<NavLink>,
}

impl NavModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            boxes: IndexMap::new(),
            links: vec![],
        }
    }

    /// Add a box; a later box with the same identifier replaces the earlier one
    pub fn add_box(&mut self, nav_box: NavBox) {
        self.boxes.insert(nav_box.id.0.clone(), nav_box);
    }

    pub fn add_link(&mut self, link: NavLink) {
        self.links.push(link);
    }

    pub fn get_box(&self, id: &Identifier) -> Option<&NavBox> {
        self.boxes.get(&id.0)
    }
}

impl Default for NavModel {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}
