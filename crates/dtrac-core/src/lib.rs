//! # dtrac-core
//!
//! Layered-architecture dependency checking over a pre-parsed class map.
//!
//! The pipeline runs in four stages:
//!
//! - [`DependencyEmitter`]s turn the [`ClassMap`] into a [`DependencyResult`]
//! - [`DependencyInheritanceFlattener`] copies ancestors' dependencies onto
//!   their descendants
//! - a [`LayerResolver`] (cached per run) maps class names to layers through
//!   the depfile's collectors
//! - [`RulesetEngine`] checks each layer pair against the [`Ruleset`]
//!
//! ## Example
//!
//! ```ignore
//! use dtrac_core::{Analysis, ClassMap, Depfile};
//!
//! let depfile = Depfile::from_file("depfile.toml".as_ref())?;
//! let class_map = ClassMap::from_file("class-map.json".as_ref())?;
//!
//! let report = Analysis::new(depfile).run(&class_map)?;
//! for violation in &report.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod class_map;
mod config;
mod dependency;
mod emitter;
mod engine;
mod error;
mod flatten;
mod graph;
mod layer;
mod ruleset;
mod violation;

/// Collectors: predicates deciding layer membership.
pub mod collector;

pub use analysis::{Analysis, AnalysisReport, AnalysisSummary};
pub use class_map::{
    Ancestry, ClassMap, ClassReference, InheritKind, InheritPath, InheritPathEntry,
    InheritRelation, InheritanceCycle, ReferenceSite,
};
pub use collector::{Collector, CollectorConfig, CollectorFactory};
pub use config::{AnalyzerSection, Depfile, DEFAULT_CLASS_MAP};
pub use dependency::{Dependency, DependencyRef, DependencyResult, InheritDependency};
pub use emitter::{
    default_emitters, BasicDependencyEmitter, DependencyEmitter, EmitterBox,
    InheritanceDependencyEmitter,
};
pub use engine::RulesetEngine;
pub use error::{ClassMapError, ConfigurationError};
pub use flatten::DependencyInheritanceFlattener;
pub use graph::{LayerEdge, LayerGraph};
pub use layer::{CachedLayerResolver, ClassNameLayerResolver, Layer, LayerResolver};
pub use ruleset::Ruleset;
pub use violation::{RulesetViolation, ViolatingDependency};
