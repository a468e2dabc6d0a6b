//! Layer-level dependency graph, used by the DOT output.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::dependency::DependencyResult;
use crate::error::ConfigurationError;
use crate::layer::LayerResolver;
use crate::ruleset::Ruleset;

/// Number of dependencies from one layer to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerEdge {
    /// Depending layer.
    pub from: String,
    /// Depended-upon layer.
    pub to: String,
    /// Dependencies (basic and inherited) behind this edge.
    pub count: usize,
}

/// Aggregated dependencies between distinct layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerGraph {
    layers: BTreeSet<String>,
    edges: BTreeMap<(String, String), usize>,
}

impl LayerGraph {
    /// Counts every dependency whose ends resolve to two different layers.
    ///
    /// # Errors
    ///
    /// Returns error if layer resolution hits an invalid collector.
    pub fn build(
        result: &DependencyResult,
        resolver: &dyn LayerResolver,
    ) -> Result<Self, ConfigurationError> {
        let mut graph = Self::default();

        for dependency in result.all() {
            let layers_a = resolver.layers_for_class(dependency.class_a())?;
            if layers_a.is_empty() {
                continue;
            }
            let layers_b = resolver.layers_for_class(dependency.class_b())?;

            for layer_a in &layers_a {
                graph.layers.insert(layer_a.clone());
                for layer_b in &layers_b {
                    graph.layers.insert(layer_b.clone());
                    if layer_a != layer_b {
                        *graph
                            .edges
                            .entry((layer_a.clone(), layer_b.clone()))
                            .or_default() += 1;
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Adds a node even if no dependency touches it.
    pub fn add_layer(&mut self, name: impl Into<String>) {
        self.layers.insert(name.into());
    }

    /// Layer names, sorted.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(String::as_str)
    }

    /// Edges, sorted by `(from, to)`.
    #[must_use]
    pub fn edges(&self) -> Vec<LayerEdge> {
        self.edges
            .iter()
            .map(|((from, to), count)| LayerEdge {
                from: from.clone(),
                to: to.clone(),
                count: *count,
            })
            .collect()
    }

    /// Renders a Graphviz digraph; edges the ruleset forbids are red.
    #[must_use]
    pub fn to_dot(&self, ruleset: &Ruleset) -> String {
        let mut out = String::from("digraph layers {\n");
        for layer in &self.layers {
            out.push_str(&format!("    \"{}\";\n", escape(layer)));
        }
        for ((from, to), count) in &self.edges {
            let style = if ruleset.is_allowed(from, to) {
                ""
            } else {
                ", color=red"
            };
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{count}\"{style}];\n",
                escape(from),
                escape(to)
            ));
        }
        out.push('}');
        out
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
