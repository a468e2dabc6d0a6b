//! `className` collector: regex match on the qualified class name.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Collector, CollectorConfig, CollectorFactory};
use crate::class_map::{ClassMap, ClassReference};
use crate::error::ConfigurationError;

/// Matches classes whose fully qualified name matches `regex`.
///
/// Matching is case-insensitive and unanchored; use `^`/`$` to anchor.
#[derive(Debug, Default)]
pub struct ClassNameCollector {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl ClassNameCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "className";

    const REGEX_KEY: &'static str = "regex";

    /// Creates a new collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pattern(&self, config: &CollectorConfig) -> Result<Regex, ConfigurationError> {
        let raw = config.required_str(Self::KIND, Self::REGEX_KEY)?;

        if let Ok(cache) = self.compiled.lock() {
            if let Some(regex) = cache.get(raw) {
                return Ok(regex.clone());
            }
        }

        let regex = RegexBuilder::new(raw)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigurationError::invalid(Self::KIND, Self::REGEX_KEY, e.to_string()))?;

        if let Ok(mut cache) = self.compiled.lock() {
            cache.insert(raw.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

impl Collector for ClassNameCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        _class_map: &ClassMap,
        _factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        Ok(self.pattern(config)?.is_match(&class.name))
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        _factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        self.pattern(config).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(regex: &str, class_name: &str) -> bool {
        let config = CollectorConfig::new(ClassNameCollector::KIND).with_str("regex", regex);
        ClassNameCollector::new()
            .satisfy(
                &config,
                &ClassReference::new(class_name, "x.php", 1),
                &ClassMap::new(),
                &CollectorFactory::empty(),
            )
            .unwrap()
    }

    #[test]
    fn kind_is_class_name() {
        assert_eq!(ClassNameCollector::new().kind(), "className");
    }

    #[test]
    fn matches_anywhere_in_the_name() {
        assert!(satisfies("a", "foo\\bar"));
        assert!(!satisfies("a", "foo\\bbr"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(satisfies("controller", "App\\Controller\\UserController"));
    }

    #[test]
    fn anchored_namespace_pattern() {
        assert!(satisfies(r"^App\\Controller\\", "App\\Controller\\UserController"));
        assert!(!satisfies(r"^App\\Controller\\", "Legacy\\App\\Controller\\Old"));
    }

    #[test]
    fn missing_regex_is_a_configuration_error() {
        let config = CollectorConfig::new(ClassNameCollector::KIND).with_str("Foo", "a");
        let err = ClassNameCollector::new()
            .satisfy(
                &config,
                &ClassReference::new("foo\\bar", "x.php", 1),
                &ClassMap::new(),
                &CollectorFactory::empty(),
            )
            .unwrap_err();
        assert_eq!(err, ConfigurationError::missing("className", "regex"));
    }

    #[test]
    fn invalid_regex_fails_validation() {
        let config = CollectorConfig::new(ClassNameCollector::KIND).with_str("regex", "App(");
        let err = ClassNameCollector::new()
            .validate(&config, &CollectorFactory::empty())
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidParameter { .. }));
    }
}
