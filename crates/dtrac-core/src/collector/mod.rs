//! Collectors: predicates deciding whether a class belongs to a layer.
//!
//! A collector is selected by the `type` key of its configuration table
//! and receives the rest of the table as parameters:
//!
//! ```toml
//! [[layers.collectors]]
//! type = "className"
//! regex = "^App\\\\Controller\\\\"
//! ```
//!
//! Combinators (`bool/and`, `bool/or`, `bool/not`) build their children
//! through the same [`CollectorFactory`], so any registered collector can
//! be nested.

mod boolean;
mod class_name;
mod factory;
mod inheritance;

pub use boolean::{AndCollector, NotCollector, OrCollector};
pub use class_name::ClassNameCollector;
pub use factory::{CollectorConstructor, CollectorFactory};
pub use inheritance::{ExtendsCollector, ImplementsCollector};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::class_map::{ClassMap, ClassReference};
use crate::error::ConfigurationError;

/// A layer membership predicate.
///
/// Implementations are stateless with respect to the analyzed code:
/// the answer depends only on the arguments.
pub trait Collector: Send + Sync {
    /// The `type` tag this collector is registered under.
    fn kind(&self) -> &'static str;

    /// Decides whether `class` satisfies this collector.
    ///
    /// # Errors
    ///
    /// Returns error if a required parameter is missing or malformed.
    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError>;

    /// Checks the parameters without evaluating against any class.
    ///
    /// # Errors
    ///
    /// Returns error if a required parameter is missing or malformed.
    fn validate(
        &self,
        config: &CollectorConfig,
        factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError>;
}

/// Type alias for shared collector trait objects.
pub type CollectorBox = Arc<dyn Collector>;

/// A collector configuration fragment: a `type` tag plus parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectorConfig(toml::Table);

impl CollectorConfig {
    /// The key holding the collector type.
    pub const TYPE_KEY: &'static str = "type";

    /// Creates a fragment with only a `type` tag.
    #[must_use]
    pub fn new(kind: &str) -> Self {
        let mut table = toml::Table::new();
        table.insert(Self::TYPE_KEY.to_string(), toml::Value::String(kind.to_string()));
        Self(table)
    }

    /// Adds a string parameter.
    #[must_use]
    pub fn with_str(mut self, key: &str, value: &str) -> Self {
        self.0
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        self
    }

    /// Adds a single nested collector parameter.
    #[must_use]
    pub fn with_child(mut self, key: &str, child: CollectorConfig) -> Self {
        self.0.insert(key.to_string(), toml::Value::Table(child.0));
        self
    }

    /// Adds a list of nested collectors.
    #[must_use]
    pub fn with_children(mut self, key: &str, children: Vec<CollectorConfig>) -> Self {
        let values = children.into_iter().map(|c| toml::Value::Table(c.0)).collect();
        self.0.insert(key.to_string(), toml::Value::Array(values));
        self
    }

    /// Returns the `type` tag, if present and a string.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.0.get(Self::TYPE_KEY).and_then(toml::Value::as_str)
    }

    /// Returns a required string parameter.
    ///
    /// # Errors
    ///
    /// Returns error if the key is absent, not a string, or empty.
    pub fn required_str(&self, collector: &str, key: &str) -> Result<&str, ConfigurationError> {
        match self.0.get(key) {
            None => Err(ConfigurationError::missing(collector, key)),
            Some(toml::Value::String(s)) if s.is_empty() => {
                Err(ConfigurationError::invalid(collector, key, "must not be empty"))
            }
            Some(toml::Value::String(s)) => Ok(s),
            Some(other) => Err(ConfigurationError::invalid(
                collector,
                key,
                format!("expected a string, found {}", other.type_str()),
            )),
        }
    }

    /// Returns a required nested collector.
    ///
    /// # Errors
    ///
    /// Returns error if the key is absent or not a table.
    pub fn required_child(
        &self,
        collector: &str,
        key: &str,
    ) -> Result<CollectorConfig, ConfigurationError> {
        match self.0.get(key) {
            None => Err(ConfigurationError::missing(collector, key)),
            Some(toml::Value::Table(t)) => Ok(Self(t.clone())),
            Some(other) => Err(ConfigurationError::invalid(
                collector,
                key,
                format!("expected a collector table, found {}", other.type_str()),
            )),
        }
    }

    /// Returns a required, non-empty list of nested collectors.
    ///
    /// # Errors
    ///
    /// Returns error if the key is absent, empty, or holds non-tables.
    pub fn required_children(
        &self,
        collector: &str,
        key: &str,
    ) -> Result<Vec<CollectorConfig>, ConfigurationError> {
        let items = match self.0.get(key) {
            None => return Err(ConfigurationError::missing(collector, key)),
            Some(toml::Value::Array(items)) => items,
            Some(other) => {
                return Err(ConfigurationError::invalid(
                    collector,
                    key,
                    format!("expected an array of collectors, found {}", other.type_str()),
                ))
            }
        };

        if items.is_empty() {
            return Err(ConfigurationError::invalid(
                collector,
                key,
                "must list at least one collector",
            ));
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                toml::Value::Table(t) => Ok(Self(t.clone())),
                other => Err(ConfigurationError::invalid(
                    collector,
                    &format!("{key}[{i}]"),
                    format!("expected a collector table, found {}", other.type_str()),
                )),
            })
            .collect()
    }
}

impl From<toml::Table> for CollectorConfig {
    fn from(table: toml::Table) -> Self {
        Self(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_toml_table() {
        let config: CollectorConfig = toml::from_str(
            r#"
type = "bool/or"
collectors = [
    { type = "className", regex = "Controller$" },
    { type = "className", regex = "Action$" },
]
"#,
        )
        .unwrap();
        assert_eq!(config.kind(), Some("bool/or"));
        assert_eq!(config.required_children("bool/or", "collectors").unwrap().len(), 2);
    }

    #[test]
    fn required_str_rejects_missing_and_wrong_type() {
        let config = CollectorConfig::new("className");
        assert!(matches!(
            config.required_str("className", "regex"),
            Err(ConfigurationError::MissingParameter { .. })
        ));

        let config: CollectorConfig = toml::from_str("type = \"className\"\nregex = 3").unwrap();
        assert!(matches!(
            config.required_str("className", "regex"),
            Err(ConfigurationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn required_children_rejects_empty_list() {
        let config = CollectorConfig::new("bool/and").with_children("collectors", vec![]);
        assert!(matches!(
            config.required_children("bool/and", "collectors"),
            Err(ConfigurationError::InvalidParameter { .. })
        ));
    }
}
