//! The ruleset: which layers may depend on which.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::ConfigurationError;
use crate::layer::Layer;

/// Allow-list of layer dependencies.
///
/// A layer may always depend on itself. Any other pair not listed is
/// forbidden, including pairs whose source layer has no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ruleset {
    allowed: BTreeMap<String, BTreeSet<String>>,
}

impl Ruleset {
    /// Creates an empty ruleset (every cross-layer dependency forbidden).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `from` to depend on each layer in `to`.
    #[must_use]
    pub fn allow<I, S>(mut self, from: &str, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .entry(from.to_string())
            .or_default()
            .extend(to.into_iter().map(Into::into));
        self
    }

    /// Returns true if `layer_a` may depend on `layer_b`.
    #[must_use]
    pub fn is_allowed(&self, layer_a: &str, layer_b: &str) -> bool {
        layer_a == layer_b
            || self
                .allowed
                .get(layer_a)
                .is_some_and(|targets| targets.contains(layer_b))
    }

    /// Layers `layer` may depend on, besides itself.
    #[must_use]
    pub fn allowed_targets(&self, layer: &str) -> Vec<&str> {
        self.allowed
            .get(layer)
            .map(|t| t.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Checks that every referenced layer is declared.
    ///
    /// # Errors
    ///
    /// Returns error naming the first undeclared layer.
    pub fn validate(&self, layers: &[Layer]) -> Result<(), ConfigurationError> {
        let declared: HashSet<&str> = layers.iter().map(|l| l.name.as_str()).collect();

        for (from, targets) in &self.allowed {
            if !declared.contains(from.as_str()) {
                return Err(ConfigurationError::UnknownLayer {
                    context: "ruleset".to_string(),
                    name: from.clone(),
                });
            }
            for target in targets {
                if !declared.contains(target.as_str()) {
                    return Err(ConfigurationError::UnknownLayer {
                        context: format!("ruleset.{from}"),
                        name: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
