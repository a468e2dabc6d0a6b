//! The class map: the parsed representation of a codebase's classes.
//!
//! The class map is produced by an external parsing layer and handed over
//! as JSON. Everything downstream (emitters, flattener, collectors) reads
//! it without mutation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ClassMapError;

/// How a class relates to one of its direct ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InheritKind {
    /// `class A extends B`
    Extends,
    /// `class A implements B`
    Implements,
}

impl fmt::Display for InheritKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extends => write!(f, "extends"),
            Self::Implements => write!(f, "implements"),
        }
    }
}

/// A direct `extends`/`implements` edge declared by a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritRelation {
    /// Qualified name of the ancestor.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Line of the `extends`/`implements` clause (1-indexed).
    pub line: usize,
    /// Relation kind.
    #[serde(default = "default_inherit_kind")]
    pub kind: InheritKind,
}

fn default_inherit_kind() -> InheritKind {
    InheritKind::Extends
}

/// A place inside a class body or signature that names another class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceSite {
    /// Qualified name of the referenced class.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Line the reference occurs on (1-indexed).
    pub line: usize,
}

/// One declared class, interface or trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassReference {
    /// Fully qualified name (e.g. `App\Controller\UserController`).
    pub name: String,
    /// Declaring file, relative to the analyzed root.
    #[serde(default)]
    pub file: PathBuf,
    /// Declaration line (1-indexed).
    #[serde(default)]
    pub line: usize,
    /// Class-name references found in the body and signatures.
    #[serde(default)]
    pub references: Vec<ReferenceSite>,
    /// Direct ancestors.
    #[serde(default)]
    pub inherits: Vec<InheritRelation>,
}

impl ClassReference {
    /// Creates a class with no references and no ancestors.
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
            references: Vec::new(),
            inherits: Vec::new(),
        }
    }

    /// Adds a reference site.
    #[must_use]
    pub fn with_reference(mut self, class_name: impl Into<String>, line: usize) -> Self {
        self.references.push(ReferenceSite {
            class_name: class_name.into(),
            line,
        });
        self
    }

    /// Adds an `extends` relation.
    #[must_use]
    pub fn extending(mut self, class_name: impl Into<String>, line: usize) -> Self {
        self.inherits.push(InheritRelation {
            class_name: class_name.into(),
            line,
            kind: InheritKind::Extends,
        });
        self
    }

    /// Adds an `implements` relation.
    #[must_use]
    pub fn implementing(mut self, class_name: impl Into<String>, line: usize) -> Self {
        self.inherits.push(InheritRelation {
            class_name: class_name.into(),
            line,
            kind: InheritKind::Implements,
        });
        self
    }
}

/// One hop of an inheritance chain: the ancestor reached and the line of
/// the clause that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InheritPathEntry {
    /// Ancestor class name.
    pub class_name: String,
    /// Line of the `extends`/`implements` clause leading to it.
    pub line: usize,
}

/// Ancestor chain from a subclass outward.
///
/// The first entry is the direct parent, the last is the ancestor the
/// chain ends at. Used for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InheritPath(Vec<InheritPathEntry>);

impl InheritPath {
    /// Returns the entries outermost-last.
    #[must_use]
    pub fn entries(&self) -> &[InheritPathEntry] {
        &self.0
    }

    /// The ancestor this path ends at.
    #[must_use]
    pub fn ancestor(&self) -> Option<&InheritPathEntry> {
        self.0.last()
    }

    /// Number of hops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn extended(&self, class_name: &str, line: usize) -> Self {
        let mut entries = self.0.clone();
        entries.push(InheritPathEntry {
            class_name: class_name.to_string(),
            line,
        });
        Self(entries)
    }
}

impl From<Vec<InheritPathEntry>> for InheritPath {
    fn from(entries: Vec<InheritPathEntry>) -> Self {
        Self(entries)
    }
}

/// An inheritance cycle found while walking ancestors.
///
/// `chain` starts and ends with the same class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InheritanceCycle {
    /// Class names along the cycle.
    pub chain: Vec<String>,
}

impl fmt::Display for InheritanceCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain.join(" -> "))
    }
}

/// All ancestors of one class, each with the path used to reach it.
#[derive(Debug, Clone, Default)]
pub struct Ancestry {
    /// Every reachable ancestor, in depth-first order.
    pub paths: Vec<InheritPath>,
    /// Back-edges that were not followed.
    pub cycles: Vec<InheritanceCycle>,
}

#[derive(Deserialize)]
struct ClassMapDto {
    #[serde(default)]
    classes: Vec<ClassReference>,
}

/// Read-only map of every class in the analyzed codebase, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    classes: BTreeMap<String, ClassReference>,
}

impl ClassMap {
    /// Creates an empty class map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a class map from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ClassMapError> {
        let content = std::fs::read_to_string(path).map_err(|e| ClassMapError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Parses a class map from JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid.
    pub fn from_json(content: &str) -> Result<Self, ClassMapError> {
        let dto: ClassMapDto = serde_json::from_str(content)?;
        Ok(dto.classes.into_iter().collect())
    }

    /// Inserts a class, replacing any class of the same name.
    pub fn insert(&mut self, class: ClassReference) {
        if let Some(previous) = self.classes.insert(class.name.clone(), class) {
            tracing::warn!(
                "Class {} declared more than once, keeping the last declaration (previous in {})",
                previous.name,
                previous.file.display()
            );
        }
    }

    /// Looks up a class by qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassReference> {
        self.classes.get(name)
    }

    /// Returns true if the class was parsed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Iterates classes sorted by name.
    pub fn classes(&self) -> impl Iterator<Item = &ClassReference> {
        self.classes.values()
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no classes were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Walks every ancestor of `name`, direct and indirect.
    ///
    /// Ancestors missing from the map are reported as the last hop of
    /// their path. A relation leading back into the current chain is
    /// recorded as a cycle instead of being followed.
    #[must_use]
    pub fn ancestry(&self, name: &str) -> Ancestry {
        let mut ancestry = Ancestry::default();
        let mut chain = vec![name.to_string()];
        self.walk_ancestors(name, &InheritPath::default(), &mut chain, &mut ancestry);
        ancestry
    }

    fn walk_ancestors(
        &self,
        name: &str,
        path: &InheritPath,
        chain: &mut Vec<String>,
        ancestry: &mut Ancestry,
    ) {
        let Some(class) = self.classes.get(name) else {
            return;
        };

        for relation in &class.inherits {
            if let Some(start) = chain.iter().position(|c| c == &relation.class_name) {
                let mut cycle = chain[start..].to_vec();
                cycle.push(relation.class_name.clone());
                ancestry.cycles.push(InheritanceCycle { chain: cycle });
                continue;
            }

            let next = path.extended(&relation.class_name, relation.line);
            ancestry.paths.push(next.clone());

            chain.push(relation.class_name.clone());
            self.walk_ancestors(&relation.class_name, &next, chain, ancestry);
            chain.pop();
        }
    }

    /// Returns true if `name` reaches `ancestor` through any relation
    /// whose final hop has the given kind (or any kind when `None`).
    #[must_use]
    pub fn inherits_from(&self, name: &str, ancestor: &str, kind: Option<InheritKind>) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![name];

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(class) = self.classes.get(current) else {
                continue;
            };
            for relation in &class.inherits {
                if relation.class_name == ancestor && kind.map_or(true, |k| k == relation.kind) {
                    return true;
                }
                stack.push(&relation.class_name);
            }
        }

        false
    }
}

impl FromIterator<ClassReference> for ClassMap {
    fn from_iter<I: IntoIterator<Item = ClassReference>>(iter: I) -> Self {
        let mut map = Self::new();
        for class in iter {
            map.insert(class);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(class_name: &str, line: usize) -> InheritPathEntry {
        InheritPathEntry {
            class_name: class_name.into(),
            line,
        }
    }

    #[test]
    fn parses_json_class_map() {
        let json = r#"{
            "classes": [
                {
                    "name": "App\\Child",
                    "file": "src/Child.php",
                    "line": 3,
                    "references": [{ "class": "App\\Logger", "line": 12 }],
                    "inherits": [
                        { "class": "App\\Base", "line": 3 },
                        { "class": "App\\Loggable", "line": 3, "kind": "implements" }
                    ]
                }
            ]
        }"#;
        let map = ClassMap::from_json(json).expect("parse failed");
        let child = map.get("App\\Child").expect("missing class");
        assert_eq!(child.references.len(), 1);
        assert_eq!(child.inherits[0].kind, InheritKind::Extends);
        assert_eq!(child.inherits[1].kind, InheritKind::Implements);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ClassMap::from_json("{ \"classes\": 3 }"),
            Err(ClassMapError::Json(_))
        ));
    }

    #[test]
    fn ancestry_walks_the_full_chain() {
        let map: ClassMap = [
            ClassReference::new("Child", "Child.php", 1).extending("Parent", 3),
            ClassReference::new("Parent", "Parent.php", 1).extending("Grand", 5),
            ClassReference::new("Grand", "Grand.php", 1),
        ]
        .into_iter()
        .collect();

        let ancestry = map.ancestry("Child");
        assert!(ancestry.cycles.is_empty());
        assert_eq!(ancestry.paths.len(), 2);
        assert_eq!(ancestry.paths[0].entries(), &[entry("Parent", 3)]);
        assert_eq!(
            ancestry.paths[1].entries(),
            &[entry("Parent", 3), entry("Grand", 5)]
        );
    }

    #[test]
    fn ancestry_keeps_unparsed_ancestor_as_last_hop() {
        let map: ClassMap = [ClassReference::new("Child", "Child.php", 1).extending("Vendor\\Base", 2)]
            .into_iter()
            .collect();

        let ancestry = map.ancestry("Child");
        assert_eq!(ancestry.paths.len(), 1);
        assert_eq!(
            ancestry.paths[0].ancestor().map(|e| e.class_name.as_str()),
            Some("Vendor\\Base")
        );
    }

    #[test]
    fn ancestry_reports_cycles_and_terminates() {
        let map: ClassMap = [
            ClassReference::new("A", "A.php", 1).extending("B", 1),
            ClassReference::new("B", "B.php", 1).extending("A", 1),
        ]
        .into_iter()
        .collect();

        let ancestry = map.ancestry("A");
        assert_eq!(ancestry.paths.len(), 1);
        assert_eq!(ancestry.cycles.len(), 1);
        assert_eq!(ancestry.cycles[0].to_string(), "A -> B -> A");
    }

    #[test]
    fn cycle_reached_from_outside_excludes_the_outsider() {
        let map: ClassMap = [
            ClassReference::new("A", "A.php", 1).extending("B", 1),
            ClassReference::new("B", "B.php", 1).extending("A", 1),
            ClassReference::new("C", "C.php", 1).extending("A", 2),
        ]
        .into_iter()
        .collect();

        let ancestry = map.ancestry("C");
        assert_eq!(ancestry.paths.len(), 2);
        assert_eq!(ancestry.cycles.len(), 1);
        assert_eq!(ancestry.cycles[0].to_string(), "A -> B -> A");
    }

    #[test]
    fn diamond_yields_one_path_per_route() {
        let map: ClassMap = [
            ClassReference::new("C", "C.php", 1)
                .implementing("Left", 2)
                .implementing("Right", 2),
            ClassReference::new("Left", "Left.php", 1).extending("Root", 4),
            ClassReference::new("Right", "Right.php", 1).extending("Root", 6),
        ]
        .into_iter()
        .collect();

        let to_root = map
            .ancestry("C")
            .paths
            .into_iter()
            .filter(|p| p.ancestor().is_some_and(|a| a.class_name == "Root"))
            .count();
        assert_eq!(to_root, 2);
    }

    #[test]
    fn inherits_from_respects_kind() {
        let map: ClassMap = [
            ClassReference::new("Repo", "Repo.php", 1)
                .extending("BaseRepo", 2)
                .implementing("Countable", 2),
            ClassReference::new("BaseRepo", "BaseRepo.php", 1).implementing("Persistable", 3),
        ]
        .into_iter()
        .collect();

        assert!(map.inherits_from("Repo", "BaseRepo", Some(InheritKind::Extends)));
        assert!(!map.inherits_from("Repo", "BaseRepo", Some(InheritKind::Implements)));
        assert!(map.inherits_from("Repo", "Persistable", Some(InheritKind::Implements)));
        assert!(map.inherits_from("Repo", "Countable", None));
        assert!(!map.inherits_from("BaseRepo", "Repo", None));
    }
}
