//! Registry mapping collector `type` tags to constructors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{
    AndCollector, ClassNameCollector, CollectorBox, CollectorConfig, ExtendsCollector,
    ImplementsCollector, NotCollector, OrCollector,
};
use crate::class_map::{ClassMap, ClassReference};
use crate::error::ConfigurationError;

/// Builds a collector instance.
pub type CollectorConstructor = fn() -> CollectorBox;

#[derive(Clone)]
struct Registration {
    constructor: CollectorConstructor,
    instance: Arc<OnceLock<CollectorBox>>,
}

/// Creates collectors from configuration fragments.
///
/// The registry is filled at startup and passed explicitly to every place
/// that builds collectors, including combinators that build their
/// children. Each constructor runs at most once per factory (clones
/// included), so per-instance caches such as compiled regexes are reused
/// across layers and nesting.
#[derive(Clone, Default)]
pub struct CollectorFactory {
    registry: BTreeMap<&'static str, Registration>,
}

impl CollectorFactory {
    /// Creates a factory with no registered collectors.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a factory with every built-in collector registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::empty()
            .register(ClassNameCollector::KIND, || Arc::new(ClassNameCollector::new()))
            .register(ExtendsCollector::KIND, || Arc::new(ExtendsCollector))
            .register(ImplementsCollector::KIND, || Arc::new(ImplementsCollector))
            .register(AndCollector::KIND, || Arc::new(AndCollector))
            .register(OrCollector::KIND, || Arc::new(OrCollector))
            .register(NotCollector::KIND, || Arc::new(NotCollector))
    }

    /// Registers a collector type, replacing any previous registration.
    #[must_use]
    pub fn register(mut self, kind: &'static str, constructor: CollectorConstructor) -> Self {
        self.registry.insert(
            kind,
            Registration {
                constructor,
                instance: Arc::new(OnceLock::new()),
            },
        );
        self
    }

    /// Registered type tags, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.registry.keys().copied().collect()
    }

    /// Returns the collector selected by the fragment's `type` key.
    ///
    /// # Errors
    ///
    /// Returns error if `type` is missing or not registered.
    pub fn create(&self, config: &CollectorConfig) -> Result<CollectorBox, ConfigurationError> {
        let kind = config
            .kind()
            .ok_or_else(|| ConfigurationError::missing("collector", CollectorConfig::TYPE_KEY))?;

        let registration =
            self.registry
                .get(kind)
                .ok_or_else(|| ConfigurationError::UnknownCollectorType {
                    kind: kind.to_string(),
                    known: self.kinds().join(", "),
                })?;

        Ok(Arc::clone(
            registration.instance.get_or_init(registration.constructor),
        ))
    }

    /// Looks up a collector and validates its parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the type is unknown or the parameters are invalid.
    pub fn validate(&self, config: &CollectorConfig) -> Result<(), ConfigurationError> {
        self.create(config)?.validate(config, self)
    }

    /// Looks up a collector and evaluates it against one class.
    ///
    /// # Errors
    ///
    /// Returns error if the type is unknown or the parameters are invalid.
    pub fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
    ) -> Result<bool, ConfigurationError> {
        self.create(config)?.satisfy(config, class, class_map, self)
    }
}

impl fmt::Debug for CollectorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}
