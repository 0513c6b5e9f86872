//! YAML model documents
//!
//! ```yaml
//! name: Shop
//! entryPoint: Home
//! pages:
//!   Home:
//!     attributes: [title, {age: Integer}]
//!     isLandmark: true
//! menus:
//!   MainMenu:
//! indexes:
//!   Products: { ref: Product }
//! links:
//!   - { from: Home, to: MainMenu }
//!   - { from: MainMenu, to: Products, type: containment, name: browse }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ModelError;

use super::{Identifier, LinkKind, NavBox, NavLink, NavModel, Stereotype, DEFAULT_TITLE};

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ModelDocument {
    name: Option<String>,
    entry_point: Option<String>,
    pages: IndexMap<String, Option<BoxSpec>>,
    menus: IndexMap<String, Option<BoxSpec>>,
    indexes: IndexMap<String, Option<BoxSpec>>,
    queries: IndexMap<String, Option<BoxSpec>>,
    processes: IndexMap<String, Option<BoxSpec>>,
    guided_tours: IndexMap<String, Option<BoxSpec>>,
    external_nodes: IndexMap<String, Option<BoxSpec>>,
    links: Vec<LinkSpec>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct BoxSpec {
    attributes: Vec<Value>,
    is_home: bool,
    is_landmark: bool,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[derive(Deserialize)]
struct LinkSpec {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: LinkKindSpec,
    condition: Option<String>,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum LinkKindSpec {
    #[default]
    Navigation,
    Containment,
    Process,
}

impl From<LinkKindSpec> for LinkKind {
    fn from(spec: LinkKindSpec) -> Self {
        match spec {
            LinkKindSpec::Navigation => LinkKind::Navigation,
            LinkKindSpec::Containment => LinkKind::Containment,
            LinkKindSpec::Process => LinkKind::Process,
        }
    }
}

/// Load a navigation model from YAML source
pub fn load_model(source: &str) -> Result<NavModel, ModelError> {
    let doc: ModelDocument = if source.trim().is_empty() {
        ModelDocument::default()
    } else {
        serde_yaml::from_str::<Option<ModelDocument>>(source)?.unwrap_or_default()
    };
    Ok(doc.into_model())
}

impl ModelDocument {
    fn into_model(self) -> NavModel {
        let mut model = NavModel::new(self.name.unwrap_or_else(|| DEFAULT_TITLE.to_string()));
        let entry_point = self.entry_point.unwrap_or_default();

        for (name, spec) in self.pages {
            let spec = spec.unwrap_or_default();
            let is_entry = name == entry_point || spec.is_home;
            model.add_box(
                NavBox::new(name, Stereotype::NavigationClass)
                    .with_attributes(format_attributes(&spec.attributes))
                    .with_entry(is_entry)
                    .with_landmark(spec.is_landmark),
            );
        }

        for (name, spec) in self.menus {
            let spec = spec.unwrap_or_default();
            model.add_box(NavBox::new(name, Stereotype::Menu).with_landmark(spec.is_landmark));
        }

        for (name, spec) in self.indexes {
            let spec = spec.unwrap_or_default();
            let mut attributes = format_attributes(&spec.attributes);
            if let Some(reference) = spec.reference.filter(|r| !r.is_empty()) {
                attributes.insert(0, format!("●- {}", reference));
            }
            model.add_box(NavBox::new(name, Stereotype::Index).with_attributes(attributes));
        }

        let plain_sections = [
            (self.queries, Stereotype::Query),
            (self.processes, Stereotype::ProcessClass),
            (self.guided_tours, Stereotype::GuidedTour),
            (self.external_nodes, Stereotype::ExternalNode),
        ];
        for (section, stereotype) in plain_sections {
            for (name, spec) in section {
                let spec = spec.unwrap_or_default();
                model.add_box(
                    NavBox::new(name, stereotype)
                        .with_attributes(format_attributes(&spec.attributes))
                        .with_landmark(spec.is_landmark),
                );
            }
        }

        for link in self.links {
            model.add_link(NavLink {
                from: Identifier(link.from),
                to: Identifier(link.to),
                name: link.name,
                kind: link.kind.into(),
                condition: link.condition,
            });
        }

        model
    }
}

/// Turn attribute entries into display lines
///
/// `title` becomes `- title`; `{age: Integer}` becomes `- age : Integer`.
fn format_attributes(entries: &[Value]) -> Vec<String> {
    let mut lines = vec![];
    for entry in entries {
        match entry {
            Value::Mapping(map) => {
                for (key, value) in map {
                    lines.push(format!("- {} : {}", scalar_text(key), scalar_text(value)));
                }
            }
            other => lines.push(format!("- {}", scalar_text(other))),
        }
    }
    lines
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
