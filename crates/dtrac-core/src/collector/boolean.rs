//! Boolean combinators over nested collectors.

use super::{Collector, CollectorConfig, CollectorFactory};
use crate::class_map::{ClassMap, ClassReference};
use crate::error::ConfigurationError;

const COLLECTORS_KEY: &str = "collectors";
const COLLECTOR_KEY: &str = "collector";

fn validate_children(
    kind: &str,
    config: &CollectorConfig,
    factory: &CollectorFactory,
) -> Result<(), ConfigurationError> {
    for child in config.required_children(kind, COLLECTORS_KEY)? {
        factory.validate(&child)?;
    }
    Ok(())
}

/// Satisfied when every collector in `collectors` is satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndCollector;

impl AndCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "bool/and";
}

impl Collector for AndCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        for child in config.required_children(Self::KIND, COLLECTORS_KEY)? {
            if !factory.satisfy(&child, class, class_map)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        validate_children(Self::KIND, config, factory)
    }
}

/// Satisfied when at least one collector in `collectors` is satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrCollector;

impl OrCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "bool/or";
}

impl Collector for OrCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        for child in config.required_children(Self::KIND, COLLECTORS_KEY)? {
            if factory.satisfy(&child, class, class_map)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        validate_children(Self::KIND, config, factory)
    }
}

/// Satisfied when the single nested `collector` is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotCollector;

impl NotCollector {
    /// Registered type tag.
    pub const KIND: &'static str = "bool/not";
}

impl Collector for NotCollector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn satisfy(
        &self,
        config: &CollectorConfig,
        class: &ClassReference,
        class_map: &ClassMap,
        factory: &CollectorFactory,
    ) -> Result<bool, ConfigurationError> {
        let child = config.required_child(Self::KIND, COLLECTOR_KEY)?;
        Ok(!factory.satisfy(&child, class, class_map)?)
    }

    fn validate(
        &self,
        config: &CollectorConfig,
        factory: &CollectorFactory,
    ) -> Result<(), ConfigurationError> {
        factory.validate(&config.required_child(Self::KIND, COLLECTOR_KEY)?)
    }
}
