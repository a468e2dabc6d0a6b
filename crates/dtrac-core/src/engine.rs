//! Ruleset engine.
//!
//! Resolves both ends of every dependency to layers and checks each layer
//! pair against the [`Ruleset`], producing [`RulesetViolation`]s.

use crate::dependency::DependencyResult;
use crate::error::ConfigurationError;
use crate::layer::LayerResolver;
use crate::ruleset::Ruleset;
use crate::violation::RulesetViolation;

/// Evaluates a dependency result against a ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesetEngine;

impl RulesetEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Collects every violation, in dependency order.
    ///
    /// A class resolving to several layers is checked once per layer pair,
    /// so one edge may produce several violations.
    ///
    /// # Errors
    ///
    /// Returns error if layer resolution hits an invalid collector.
    pub fn violations(
        &self,
        result: &DependencyResult,
        resolver: &dyn LayerResolver,
        ruleset: &Ruleset,
    ) -> Result<Vec<RulesetViolation>, ConfigurationError> {
        let mut violations = Vec::new();

        for dependency in result.all() {
            let layers_a = resolver.layers_for_class(dependency.class_a())?;
            if layers_a.is_empty() {
                continue;
            }

            let layers_b = resolver.layers_for_class(dependency.class_b())?;

            for layer_a in &layers_a {
                for layer_b in &layers_b {
                    if ruleset.is_allowed(layer_a, layer_b) {
                        continue;
                    }
                    violations.push(RulesetViolation::new(dependency, layer_a, layer_b));
                }
            }
        }

        tracing::debug!("Found {} violation(s)", violations.len());
        Ok(violations)
    }
}
