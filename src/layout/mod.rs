//! Layout pipeline for navigation diagrams
//!
//! Takes a [`NavModel`] and produces a [`DiagramLayout`] with positioned
//! boxes, routed links and the package frame:
//!
//! 1. links with an unknown endpoint are dropped with a [`LinkWarning`]
//! 2. box sizes are estimated from their text ([`geometry`])
//! 3. a sized graph is handed to a [`LayoutEngine`] ([`request`], [`engine`])
//! 4. engine coordinates are converted to SVG space ([`translate`])

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod label;
pub mod plain;
pub mod request;
pub mod translate;
pub mod types;

pub use config::{BoxMetrics, LayoutConfig};
pub use engine::{EngineOutput, GraphvizEngine, LayoutEngine, RoutedEdge};
pub use error::LayoutError;
pub use request::LayoutRequest;
pub use types::*;

use std::fmt;
use std::time::Instant;

use log::{debug, info, warn};

use crate::model::{Identifier, NavLink, NavModel};

/// A link dropped because one of its endpoints is not a box in the model
#[derive(Debug, Clone, PartialEq)]
pub struct LinkWarning {
    pub from: Identifier,
    pub to: Identifier,
    /// The endpoint that could not be found (the source if both are missing)
    pub missing: Identifier,
    /// Existing box names close to the missing one
    pub suggestions: Vec<String>,
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "link '{}' -> '{}' dropped: unknown box '{}'",
            self.from, self.to, self.missing
        )?;
        if !self.suggestions.is_empty() {
            write!(f, " (did you mean: {}?)", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

/// Split the model's links into renderable links and warnings for dangling ones
pub fn validate_links(model: &NavModel) -> (Vec<NavLink>, Vec<LinkWarning>) {
    let mut valid = Vec::with_capacity(model.links.len());
    let mut warnings = Vec::new();

    for link in &model.links {
        let missing = [&link.from, &link.to]
            .into_iter()
            .find(|id| model.get_box(id).is_none());

        match missing {
            None => valid.push(link.clone()),
            Some(missing) => {
                let warning = LinkWarning {
                    from: link.from.clone(),
                    to: link.to.clone(),
                    missing: missing.clone(),
                    suggestions: find_similar(model, missing.as_str(), 2),
                };
                warn!(from = link.from.as_str(), to = link.to.as_str(), missing = missing.as_str(); "{}", warning);
                warnings.push(warning);
            }
        }
    }

    (valid, warnings)
}

/// Compute the complete layout for a model
///
/// Dangling links are dropped and reported; any engine failure is fatal.
pub fn compute(
    model: &NavModel,
    config: &LayoutConfig,
    engine: &dyn LayoutEngine,
) -> Result<(DiagramLayout, Vec<LinkWarning>), LayoutError> {
    let (links, warnings) = validate_links(model);
    info!(boxes = model.boxes.len(), links = links.len(), dropped = warnings.len(); "Validated model");

    let boxes: Vec<BoxLayout> = model
        .boxes
        .values()
        .map(|b| {
            let (width, height) = geometry::estimate(b, &config.metrics);
            BoxLayout::sized(b, width, height)
        })
        .collect();

    let request = request::build(&boxes, &links, config);
    debug!(nodes = request.nodes.len(), edges = request.edges.len(); "Built layout request");

    let started = Instant::now();
    let output = engine.layout(&request)?;
    debug!(elapsed_ms = started.elapsed().as_millis() as u64; "Layout engine finished");

    let layout = translate::translate(boxes, &links, &model.title, &request, &output, config);
    info!(width = layout.width, height = layout.height; "Computed layout");

    Ok((layout, warnings))
}

/// Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Box names within `max_distance` edits of `target`, closest first, at most three
fn find_similar(model: &NavModel, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(&String, usize)> = model
        .boxes
        .keys()
        .map(|name| (name, levenshtein_distance(name, target)))
        .filter(|&(_, dist)| dist > 0 && dist <= max_distance)
        .collect();

    candidates.sort_by_key(|&(_, dist)| dist);
    candidates
        .into_iter()
        .take(3)
        .map(|(name, _)| name.clone())
        .collect()
}
