//! Inheritance flattening: descendants inherit their ancestors' dependencies.

use crate::class_map::{ClassMap, InheritanceCycle};
use crate::dependency::{DependencyResult, InheritDependency};

/// Expands basic dependencies along inheritance chains.
///
/// For every class `C` and every ancestor `A` reachable from it, each basic
/// dependency `A -> X` yields an [`InheritDependency`] `C -> X` carrying the
/// path from `C` to `A`. Only basic dependencies are walked, so already
/// flattened entries never feed back into the expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyInheritanceFlattener;

impl DependencyInheritanceFlattener {
    /// Creates a new flattener.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Appends inherit dependencies to `result`.
    ///
    /// Running it again on the same result adds nothing. Returns the
    /// inheritance cycles encountered; they are skipped, not followed.
    pub fn flatten_dependencies(
        &self,
        class_map: &ClassMap,
        result: &mut DependencyResult,
    ) -> Vec<InheritanceCycle> {
        let mut cycles: Vec<InheritanceCycle> = Vec::new();
        let mut added = 0;

        for class in class_map.classes() {
            let ancestry = class_map.ancestry(&class.name);

            for cycle in ancestry.cycles {
                if !cycles.iter().any(|c| same_cycle(c, &cycle)) {
                    tracing::warn!("Inheritance cycle detected: {cycle}");
                    cycles.push(cycle);
                }
            }

            let mut inherited = Vec::new();
            for path in ancestry.paths {
                let Some(ancestor) = path.ancestor() else {
                    continue;
                };
                for original in result.dependencies_of(&ancestor.class_name) {
                    inherited.push(InheritDependency {
                        class_a: class.name.clone(),
                        class_b: original.class_b.clone(),
                        path: path.clone(),
                        original: original.clone(),
                    });
                }
            }

            if !inherited.is_empty() {
                added += result.extend_inherit_dependencies(&class.name, inherited);
            }
        }

        tracing::debug!("Flattened {added} inherited dependencies");
        cycles
    }
}

/// Two cycles are the same if one is a rotation of the other.
fn same_cycle(a: &InheritanceCycle, b: &InheritanceCycle) -> bool {
    let ring = |c: &InheritanceCycle| -> Vec<String> {
        let mut ring: Vec<String> = c.chain[..c.chain.len().saturating_sub(1)].to_vec();
        if let Some(min) = ring.iter().enumerate().min_by_key(|(_, n)| *n).map(|(i, _)| i) {
            ring.rotate_left(min);
        }
        ring
    };
    ring(a) == ring(b)
}
