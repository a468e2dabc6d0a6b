//! Dependency edges and the per-run result that accumulates them.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::class_map::InheritPath;

/// `class_a`, at `class_a_line`, references `class_b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    /// Depending class.
    pub class_a: String,
    /// Line in `class_a` where the reference occurs.
    pub class_a_line: usize,
    /// Depended-upon class.
    pub class_b: String,
}

impl Dependency {
    /// Creates a new dependency edge.
    #[must_use]
    pub fn new(class_a: impl Into<String>, class_a_line: usize, class_b: impl Into<String>) -> Self {
        Self {
            class_a: class_a.into(),
            class_a_line,
            class_b: class_b.into(),
        }
    }
}

/// A dependency held by an ancestor, attributed to a descendant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InheritDependency {
    /// The descendant the dependency is attributed to.
    pub class_a: String,
    /// Depended-upon class.
    pub class_b: String,
    /// Ancestor chain from `class_a` to the ancestor holding `original`.
    pub path: InheritPath,
    /// The basic dependency discovered on the ancestor.
    pub original: Dependency,
}

/// Either kind of dependency, as seen by the ruleset engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DependencyRef<'a> {
    /// A direct reference.
    Basic(&'a Dependency),
    /// A reference inherited through an ancestor.
    Inherit(&'a InheritDependency),
}

impl<'a> DependencyRef<'a> {
    /// Depending class.
    #[must_use]
    pub fn class_a(&self) -> &'a str {
        match self {
            Self::Basic(d) => &d.class_a,
            Self::Inherit(d) => &d.class_a,
        }
    }

    /// Depended-upon class.
    #[must_use]
    pub fn class_b(&self) -> &'a str {
        match self {
            Self::Basic(d) => &d.class_b,
            Self::Inherit(d) => &d.class_b,
        }
    }
}

/// Every dependency discovered during one analysis run.
///
/// Keyed by depending class name; iteration is sorted by class name and
/// keeps insertion order within a class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyResult {
    dependencies: BTreeMap<String, Vec<Dependency>>,
    inherit_dependencies: BTreeMap<String, Vec<InheritDependency>>,
}

impl DependencyResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a basic dependency.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies
            .entry(dependency.class_a.clone())
            .or_default()
            .push(dependency);
    }

    /// Appends an inherit dependency unless an identical one is present.
    ///
    /// Returns `false` when it was already recorded.
    pub fn add_inherit_dependency(&mut self, dependency: InheritDependency) -> bool {
        let bucket = self
            .inherit_dependencies
            .entry(dependency.class_a.clone())
            .or_default();
        if bucket.contains(&dependency) {
            return false;
        }
        bucket.push(dependency);
        true
    }

    /// Appends a batch of inherit dependencies for one class, skipping
    /// those already recorded. Returns how many were added.
    pub fn extend_inherit_dependencies(
        &mut self,
        class_a: &str,
        dependencies: Vec<InheritDependency>,
    ) -> usize {
        let bucket = self
            .inherit_dependencies
            .entry(class_a.to_string())
            .or_default();
        let mut known: HashSet<InheritDependency> = bucket.iter().cloned().collect();
        let before = bucket.len();
        for dependency in dependencies {
            if known.insert(dependency.clone()) {
                bucket.push(dependency);
            }
        }
        bucket.len() - before
    }

    /// Basic dependencies of one class.
    #[must_use]
    pub fn dependencies_of(&self, class_a: &str) -> &[Dependency] {
        self.dependencies
            .get(class_a)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Inherit dependencies of one class.
    #[must_use]
    pub fn inherit_dependencies_of(&self, class_a: &str) -> &[InheritDependency] {
        self.inherit_dependencies
            .get(class_a)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All basic dependencies, sorted by depending class.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values().flatten()
    }

    /// All inherit dependencies, sorted by depending class.
    pub fn inherit_dependencies(&self) -> impl Iterator<Item = &InheritDependency> {
        self.inherit_dependencies.values().flatten()
    }

    /// Every dependency: per class, basic ones first, then inherited ones.
    #[must_use]
    pub fn all(&self) -> Vec<DependencyRef<'_>> {
        let mut classes: Vec<&String> = self
            .dependencies
            .keys()
            .chain(self.inherit_dependencies.keys())
            .collect();
        classes.sort();
        classes.dedup();

        let mut all = Vec::new();
        for class in classes {
            all.extend(self.dependencies_of(class).iter().map(DependencyRef::Basic));
            all.extend(
                self.inherit_dependencies_of(class)
                    .iter()
                    .map(DependencyRef::Inherit),
            );
        }
        all
    }

    /// Number of basic dependencies.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.dependencies.values().map(Vec::len).sum()
    }

    /// Number of inherit dependencies.
    #[must_use]
    pub fn inherit_dependency_count(&self) -> usize {
        self.inherit_dependencies.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_map::InheritPathEntry;

    fn inherit(class_a: &str, ancestor: &str, target: &str) -> InheritDependency {
        InheritDependency {
            class_a: class_a.into(),
            class_b: target.into(),
            path: vec![InheritPathEntry {
                class_name: ancestor.into(),
                line: 3,
            }]
            .into(),
            original: Dependency::new(ancestor, 10, target),
        }
    }

    #[test]
    fn groups_by_depending_class() {
        let mut result = DependencyResult::new();
        result.add_dependency(Dependency::new("B", 1, "X"));
        result.add_dependency(Dependency::new("A", 2, "Y"));
        result.add_dependency(Dependency::new("A", 5, "Z"));

        assert_eq!(result.dependencies_of("A").len(), 2);
        assert_eq!(result.dependency_count(), 3);
        let order: Vec<&str> = result.dependencies().map(|d| d.class_a.as_str()).collect();
        assert_eq!(order, ["A", "A", "B"]);
    }

    #[test]
    fn identical_inherit_dependency_is_recorded_once() {
        let mut result = DependencyResult::new();
        assert!(result.add_inherit_dependency(inherit("Child", "Base", "Logger")));
        assert!(!result.add_inherit_dependency(inherit("Child", "Base", "Logger")));
        assert_eq!(result.inherit_dependency_count(), 1);
    }

    #[test]
    fn extend_skips_known_entries() {
        let mut result = DependencyResult::new();
        result.add_inherit_dependency(inherit("Child", "Base", "Logger"));
        let added = result.extend_inherit_dependencies(
            "Child",
            vec![
                inherit("Child", "Base", "Logger"),
                inherit("Child", "Other", "Logger"),
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(result.inherit_dependencies_of("Child").len(), 2);
    }

    #[test]
    fn all_lists_basic_before_inherited_per_class() {
        let mut result = DependencyResult::new();
        result.add_inherit_dependency(inherit("A", "Base", "Logger"));
        result.add_dependency(Dependency::new("A", 4, "Mailer"));
        result.add_dependency(Dependency::new("B", 1, "A"));

        let all = result.all();
        assert_eq!(all.len(), 3);
        assert!(matches!(all[0], DependencyRef::Basic(d) if d.class_b == "Mailer"));
        assert!(matches!(all[1], DependencyRef::Inherit(_)));
        assert_eq!(all[2].class_a(), "B");
    }
}
