//! Ruleset violations and their console rendering.

use serde::Serialize;
use std::fmt;

use crate::dependency::{Dependency, DependencyRef, InheritDependency};

/// The dependency behind a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViolatingDependency {
    /// A direct reference.
    Basic(Dependency),
    /// A reference inherited through an ancestor.
    Inherit(InheritDependency),
}

impl ViolatingDependency {
    /// Depending class.
    #[must_use]
    pub fn class_a(&self) -> &str {
        match self {
            Self::Basic(d) => &d.class_a,
            Self::Inherit(d) => &d.class_a,
        }
    }

    /// Depended-upon class.
    #[must_use]
    pub fn class_b(&self) -> &str {
        match self {
            Self::Basic(d) => &d.class_b,
            Self::Inherit(d) => &d.class_b,
        }
    }

    /// Line to point at: the reference site, or for inherited
    /// dependencies the first `extends`/`implements` clause.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Basic(d) => d.class_a_line,
            Self::Inherit(d) => d
                .path
                .entries()
                .first()
                .map_or(d.original.class_a_line, |e| e.line),
        }
    }
}

impl From<DependencyRef<'_>> for ViolatingDependency {
    fn from(dependency: DependencyRef<'_>) -> Self {
        match dependency {
            DependencyRef::Basic(d) => Self::Basic(d.clone()),
            DependencyRef::Inherit(d) => Self::Inherit(d.clone()),
        }
    }
}

/// A dependency whose layer pair the ruleset does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RulesetViolation {
    /// The offending dependency.
    pub dependency: ViolatingDependency,
    /// Layer of the depending class.
    pub layer_a: String,
    /// Layer of the depended-upon class.
    pub layer_b: String,
}

impl RulesetViolation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        dependency: impl Into<ViolatingDependency>,
        layer_a: impl Into<String>,
        layer_b: impl Into<String>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            layer_a: layer_a.into(),
            layer_b: layer_b.into(),
        }
    }

    /// Returns true if the violation was caused through inheritance.
    #[must_use]
    pub fn is_inherited(&self) -> bool {
        matches!(self.dependency, ViolatingDependency::Inherit(_))
    }

    /// Single-line form: `Class::line must not depend on Other (A on B)`.
    #[must_use]
    pub fn format_compact(&self) -> String {
        format!(
            "{}::{} must not depend on {} ({} on {})",
            self.dependency.class_a(),
            self.dependency.line(),
            self.dependency.class_b(),
            self.layer_a,
            self.layer_b
        )
    }
}

impl From<Dependency> for ViolatingDependency {
    fn from(dependency: Dependency) -> Self {
        Self::Basic(dependency)
    }
}

impl From<InheritDependency> for ViolatingDependency {
    fn from(dependency: InheritDependency) -> Self {
        Self::Inherit(dependency)
    }
}

impl fmt::Display for RulesetViolation {
    /// Direct violations render on one line. Inherited ones list the
    /// ancestor chain innermost-first, ending at the original reference.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dependency {
            ViolatingDependency::Basic(d) => write!(
                f,
                "{}::{} must not depend on {} ({} on {})",
                d.class_a, d.class_a_line, d.class_b, self.layer_a, self.layer_b
            ),
            ViolatingDependency::Inherit(d) => {
                write!(
                    f,
                    "{} must not depend on {} ({} on {}) \n",
                    d.class_a, d.class_b, self.layer_a, self.layer_b
                )?;
                let mut hops: Vec<String> = d
                    .path
                    .entries()
                    .iter()
                    .rev()
                    .map(|e| format!("\t{}::{}", e.class_name, e.line))
                    .collect();
                hops.push(format!(
                    "\t{}::{}",
                    d.original.class_b, d.original.class_a_line
                ));
                write!(f, "{}", hops.join(" -> \n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_map::InheritPathEntry;

    fn inherited() -> RulesetViolation {
        RulesetViolation::new(
            InheritDependency {
                class_a: "Child".into(),
                class_b: "Vendor\\Logger".into(),
                path: vec![
                    InheritPathEntry {
                        class_name: "Parent".into(),
                        line: 3,
                    },
                    InheritPathEntry {
                        class_name: "Base".into(),
                        line: 7,
                    },
                ]
                .into(),
                original: Dependency::new("Base", 10, "Vendor\\Logger"),
            },
            "Domain",
            "Vendor",
        )
    }

    #[test]
    fn direct_violation_renders_on_one_line() {
        let v = RulesetViolation::new(
            Dependency::new("App\\Repository\\UserRepo", 12, "App\\Controller\\UserController"),
            "Repository",
            "Controller",
        );
        assert_eq!(
            v.to_string(),
            "App\\Repository\\UserRepo::12 must not depend on App\\Controller\\UserController (Repository on Controller)"
        );
        assert!(!v.is_inherited());
    }

    #[test]
    fn inherited_violation_lists_path_innermost_first() {
        let rendered = inherited().to_string();
        assert_eq!(
            rendered,
            "Child must not depend on Vendor\\Logger (Domain on Vendor) \n\
             \tBase::7 -> \n\
             \tParent::3 -> \n\
             \tVendor\\Logger::10"
        );
    }

    #[test]
    fn path_order_is_untouched_by_rendering() {
        let v = inherited();
        let _ = v.to_string();
        let ViolatingDependency::Inherit(d) = &v.dependency else {
            panic!("expected inherit dependency");
        };
        assert_eq!(d.path.entries()[0].class_name, "Parent");
    }

    #[test]
    fn compact_form_points_at_first_clause() {
        assert_eq!(
            inherited().format_compact(),
            "Child::3 must not depend on Vendor\\Logger (Domain on Vendor)"
        );
    }
}
