//! End-to-end analysis of one class map against one depfile.

use serde::Serialize;
use tracing::{debug, info};

use crate::class_map::{ClassMap, InheritanceCycle};
use crate::collector::CollectorFactory;
use crate::config::Depfile;
use crate::dependency::DependencyResult;
use crate::emitter::{default_emitters, EmitterBox};
use crate::engine::RulesetEngine;
use crate::error::ConfigurationError;
use crate::flatten::DependencyInheritanceFlattener;
use crate::graph::LayerGraph;
use crate::layer::{CachedLayerResolver, ClassNameLayerResolver};
use crate::violation::RulesetViolation;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Basic and inherited dependencies.
    pub dependencies: DependencyResult,
    /// Forbidden layer dependencies, in dependency order.
    pub violations: Vec<RulesetViolation>,
    /// Inheritance cycles skipped while flattening.
    pub cycles: Vec<InheritanceCycle>,
    /// Dependencies aggregated per layer pair.
    pub layer_graph: LayerGraph,
}

impl AnalysisReport {
    /// Returns true if no violations were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Summary counts, for machine-readable output.
    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            dependencies: self.dependencies.dependency_count(),
            inherit_dependencies: self.dependencies.inherit_dependency_count(),
            violations: self.violations.len(),
            cycles: self.cycles.len(),
        }
    }
}

/// Counts reported alongside violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Direct dependencies.
    pub dependencies: usize,
    /// Dependencies inherited through ancestors.
    pub inherit_dependencies: usize,
    /// Violations found.
    pub violations: usize,
    /// Inheritance cycles skipped.
    pub cycles: usize,
}

/// Configures and runs the pipeline.
///
/// # Example
///
/// ```ignore
/// let report = Analysis::new(depfile).run(&class_map)?;
/// for violation in &report.violations {
///     println!("{violation}");
/// }
/// ```
pub struct Analysis {
    depfile: Depfile,
    factory: CollectorFactory,
    emitters: Vec<EmitterBox>,
}

impl Analysis {
    /// Creates an analysis with the built-in collectors and emitters.
    #[must_use]
    pub fn new(depfile: Depfile) -> Self {
        Self {
            depfile,
            factory: CollectorFactory::with_builtins(),
            emitters: default_emitters(),
        }
    }

    /// Replaces the collector factory.
    #[must_use]
    pub fn with_factory(mut self, factory: CollectorFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Appends an emitter after the built-in ones.
    #[must_use]
    pub fn with_emitter(mut self, emitter: EmitterBox) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// The depfile this analysis evaluates.
    #[must_use]
    pub fn depfile(&self) -> &Depfile {
        &self.depfile
    }

    /// Runs emission, flattening and ruleset evaluation.
    ///
    /// # Errors
    ///
    /// Returns error if the depfile is invalid. Nothing is evaluated in
    /// that case.
    pub fn run(&self, class_map: &ClassMap) -> Result<AnalysisReport, ConfigurationError> {
        self.depfile.validate(&self.factory)?;
        let resolver = CachedLayerResolver::new(ClassNameLayerResolver::new(
            &self.depfile.layers,
            class_map,
            self.factory.clone(),
        )?);

        info!(
            "Analyzing {} classes against {} layers",
            class_map.len(),
            self.depfile.layers.len()
        );

        let mut dependencies = DependencyResult::new();
        for emitter in &self.emitters {
            emitter.apply_dependencies(class_map, &mut dependencies);
            debug!(
                "{} emitter: {} dependencies so far",
                emitter.name(),
                dependencies.dependency_count()
            );
        }

        let cycles =
            DependencyInheritanceFlattener::new().flatten_dependencies(class_map, &mut dependencies);
        info!(
            "Collected {} dependencies ({} inherited)",
            dependencies.dependency_count(),
            dependencies.inherit_dependency_count()
        );

        let violations =
            RulesetEngine::new().violations(&dependencies, &resolver, &self.depfile.ruleset)?;

        let mut layer_graph = LayerGraph::build(&dependencies, &resolver)?;
        for layer in &self.depfile.layers {
            layer_graph.add_layer(&layer.name);
        }
        debug!("Resolved layers for {} classes", resolver.cached_len());

        info!("Analysis complete: {} violation(s)", violations.len());

        Ok(AnalysisReport {
            dependencies,
            violations,
            cycles,
            layer_graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_map::ClassReference;
    use crate::collector::CollectorConfig;
    use crate::layer::Layer;
    use crate::ruleset::Ruleset;

    fn depfile() -> Depfile {
        Depfile {
            layers: vec![
                Layer::new(
                    "Domain",
                    vec![CollectorConfig::new("className").with_str("regex", "^App\\\\Domain\\\\")],
                ),
                Layer::new(
                    "Vendor",
                    vec![CollectorConfig::new("className").with_str("regex", "^Vendor\\\\")],
                ),
            ],
            ruleset: Ruleset::new().allow("Domain", Vec::<String>::new()),
            ..Depfile::default()
        }
    }

    fn class_map() -> ClassMap {
        [
            ClassReference::new("App\\Domain\\Base", "Base.php", 1)
                .with_reference("Vendor\\Logger", 10),
            ClassReference::new("App\\Domain\\Child", "Child.php", 1)
                .extending("App\\Domain\\Base", 3),
            ClassReference::new("Vendor\\Logger", "Logger.php", 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn reports_direct_and_inherited_violations() {
        let report = Analysis::new(depfile()).run(&class_map()).unwrap();

        assert!(!report.is_clean());
        assert_eq!(report.violations.len(), 2);
        assert!(!report.violations[0].is_inherited());
        assert_eq!(report.violations[0].dependency.class_a(), "App\\Domain\\Base");
        assert!(report.violations[1].is_inherited());
        assert_eq!(report.violations[1].dependency.class_a(), "App\\Domain\\Child");
    }

    #[test]
    fn summary_counts_each_stage() {
        let report = Analysis::new(depfile()).run(&class_map()).unwrap();
        assert_eq!(
            report.summary(),
            AnalysisSummary {
                dependencies: 2,
                inherit_dependencies: 1,
                violations: 2,
                cycles: 0,
            }
        );
    }

    #[test]
    fn invalid_depfile_aborts_before_evaluation() {
        let mut broken = depfile();
        broken.layers.push(Layer::new("Odd", vec![CollectorConfig::new("directory")]));
        let err = Analysis::new(broken).run(&class_map()).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownCollectorType { .. }));
    }

    #[test]
    fn declared_layers_appear_in_graph_without_edges() {
        let mut config = depfile();
        config.layers.push(Layer::new(
            "Unused",
            vec![CollectorConfig::new("className").with_str("regex", "^Nothing$")],
        ));
        let report = Analysis::new(config).run(&class_map()).unwrap();
        assert!(report.layer_graph.layers().any(|l| l == "Unused"));
    }
}
