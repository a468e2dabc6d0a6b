//! Dependency emitters: turn the class map into dependency edges.

use crate::class_map::ClassMap;
use crate::dependency::{Dependency, DependencyResult};

/// A pass over the class map that appends dependencies to a result.
///
/// Each discovered edge is appended exactly once per run.
pub trait DependencyEmitter: Send + Sync {
    /// Returns the emitter name used in progress logs.
    fn name(&self) -> &'static str;

    /// Appends every dependency this emitter discovers.
    fn apply_dependencies(&self, class_map: &ClassMap, result: &mut DependencyResult);
}

/// Type alias for boxed emitter trait objects.
pub type EmitterBox = Box<dyn DependencyEmitter>;

/// Emits one dependency per class-name reference inside a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicDependencyEmitter;

impl DependencyEmitter for BasicDependencyEmitter {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn apply_dependencies(&self, class_map: &ClassMap, result: &mut DependencyResult) {
        for class in class_map.classes() {
            for site in &class.references {
                result.add_dependency(Dependency::new(&class.name, site.line, &site.class_name));
            }
        }
    }
}

/// Emits one dependency per direct `extends`/`implements` relation.
///
/// These edges seed the inheritance graph the flattener expands.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritanceDependencyEmitter;

impl DependencyEmitter for InheritanceDependencyEmitter {
    fn name(&self) -> &'static str {
        "inheritance"
    }

    fn apply_dependencies(&self, class_map: &ClassMap, result: &mut DependencyResult) {
        for class in class_map.classes() {
            for relation in &class.inherits {
                result.add_dependency(Dependency::new(
                    &class.name,
                    relation.line,
                    &relation.class_name,
                ));
            }
        }
    }
}

/// The emitters every analysis runs, inheritance first.
#[must_use]
pub fn default_emitters() -> Vec<EmitterBox> {
    vec![
        Box::new(InheritanceDependencyEmitter),
        Box::new(BasicDependencyEmitter),
    ]
}
