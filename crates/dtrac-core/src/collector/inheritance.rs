//! Structural collectors backed by the class map's inheritance graph.

use super::{Collector, CollectorConfig, CollectorFactory};
use crate::class_map::{ClassMap, ClassReference, InheritKind};
use crate::error::ConfigurationError;

/// Matches classes that extend `class`, directly or through ancestors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendsCollector;

impl ExtendsCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "extends";

    const CLASS_KEY: &'static str = "class";
}

impl Collector for ExtendsCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        _factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        let parent = config.required_str(Self::KIND, Self::CLASS_KEY)?;
        Ok(class_map.inherits_from(&class.name, parent, Some(InheritKind::Extends)))
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        _factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        config.required_str(Self::KIND, Self::CLASS_KEY).map(|_| ())
    }
}

/// Matches classes that implement `interface`, either themselves or via
/// an ancestor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplementsCollector;

impl ImplementsCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "implements";

    const INTERFACE_KEY: &'static str = "interface";
}

impl Collector for ImplementsCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        _factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        let interface = config.required_str(Self::KIND, Self::INTERFACE_KEY)?;
        Ok(class_map.inherits_from(&class.name, interface, Some(InheritKind::Implements)))
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        _factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        config
            .required_str(Self::KIND, Self::INTERFACE_KEY)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_map() -> ClassMap {
        [
            ClassReference::new("App\\Repo\\UserRepo", "UserRepo.php", 1)
                .extending("App\\Repo\\AbstractRepo", 4),
            ClassReference::new("App\\Repo\\AbstractRepo", "AbstractRepo.php", 1)
                .extending("Doctrine\\EntityRepository", 6)
                .implementing("App\\Repo\\RepositoryInterface", 6),
        ]
        .into_iter()
        .collect()
    }

    fn check(collector: &dyn Collector, config: &CollectorConfig, class_name: &str) -> bool {
        let map = class_map();
        let class = map.get(class_name).cloned().unwrap();
        collector
            .satisfy(config, &class, &map, &CollectorFactory::empty())
            .unwrap()
    }

    #[test]
    fn extends_follows_ancestors() {
        let config = CollectorConfig::new("extends").with_str("class", "Doctrine\\EntityRepository");
        assert!(check(&ExtendsCollector, &config, "App\\Repo\\UserRepo"));
        assert!(check(&ExtendsCollector, &config, "App\\Repo\\AbstractRepo"));
    }

    #[test]
    fn extends_does_not_match_interfaces() {
        let config = CollectorConfig::new("extends").with_str("class", "App\\Repo\\RepositoryInterface");
        assert!(!check(&ExtendsCollector, &config, "App\\Repo\\UserRepo"));
    }

    #[test]
    fn implements_sees_interfaces_of_ancestors() {
        let config =
            CollectorConfig::new("implements").with_str("interface", "App\\Repo\\RepositoryInterface");
        assert!(check(&ImplementsCollector, &config, "App\\Repo\\UserRepo"));
    }

    #[test]
    fn missing_parameters_are_reported() {
        let factory = CollectorFactory::empty();
        assert_eq!(
            ExtendsCollector
                .validate(&CollectorConfig::new("extends"), &factory)
                .unwrap_err(),
            ConfigurationError::missing("extends", "class")
        );
        assert_eq!(
            ImplementsCollector
                .validate(&CollectorConfig::new("implements"), &factory)
                .unwrap_err(),
            ConfigurationError::missing("implements", "interface")
        );
    }
}
