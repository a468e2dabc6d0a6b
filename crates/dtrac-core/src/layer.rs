//! Layer resolution: maps class names to architecture layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::class_map::ClassMap;
use crate::collector::{CollectorBox, CollectorConfig, CollectorFactory};
use crate::error::ConfigurationError;

/// A named partition of the codebase.
///
/// A class belongs to the layer if any of its top-level collectors is
/// satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name (e.g. `"Controller"`).
    pub name: String,
    /// Collector fragments, in declaration order.
    #[serde(default)]
    pub collectors: Vec<CollectorConfig>,
}

impl Layer {
    /// Creates a new layer.
    #[must_use]
    pub fn new(name: impl Into<String>, collectors: Vec<CollectorConfig>) -> Self {
        Self {
            name: name.into(),
            collectors,
        }
    }
}

/// Answers which layers a class belongs to.
pub trait LayerResolver: Send + Sync {
    /// Returns the layers of `class_name`, in layer declaration order.
    ///
    /// Classes outside the analyzed set resolve to no layer.
    ///
    /// # Errors
    ///
    /// Returns error if a collector configuration turns out to be invalid.
    fn layers_for_class(&self, class_name: &str) -> Result<Vec<String>, ConfigurationError>;
}

struct ResolvedLayer {
    name: String,
    collectors: Vec<(CollectorConfig, CollectorBox)>,
}

/// Evaluates every layer's collectors against the class map.
pub struct ClassNameLayerResolver<'a> {
    layers: Vec<ResolvedLayer>,
    class_map: &'a ClassMap,
    factory: CollectorFactory,
}

impl<'a> ClassNameLayerResolver<'a> {
    /// Builds a resolver, validating every collector up front.
    ///
    /// # Errors
    ///
    /// Returns the first collector configuration error found.
    pub fn new(
        layers: &[Layer],
        class_map: &'a ClassMap,
        factory: CollectorFactory,
    ) -> Result<Self, ConfigurationError> {
        let mut resolved = Vec::with_capacity(layers.len());
        for layer in layers {
            let mut collectors = Vec::with_capacity(layer.collectors.len());
            for config in &layer.collectors {
                let collector = factory.create(config)?;
                collector.validate(config, &factory)?;
                collectors.push((config.clone(), collector));
            }
            resolved.push(ResolvedLayer {
                name: layer.name.clone(),
                collectors,
            });
        }

        Ok(Self {
            layers: resolved,
            class_map,
            factory,
        })
    }
}

impl LayerResolver for ClassNameLayerResolver<'_> {
    fn layers_for_class(&self, class_name: &str) -> Result<Vec<String>, ConfigurationError> {
        let Some(class) = self.class_map.get(class_name) else {
            tracing::trace!("{class_name} is not in the class map, no layer");
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for layer in &self.layers {
            for (config, collector) in &layer.collectors {
                if collector.satisfy(config, class, self.class_map, &self.factory)? {
                    names.push(layer.name.clone());
                    break;
                }
            }
        }
        Ok(names)
    }
}

/// Memoizes another resolver per class name for the lifetime of a run.
///
/// Errors are passed through without being cached.
pub struct CachedLayerResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, Vec<String>>>,
}

impl<R: LayerResolver> CachedLayerResolver<R> {
    /// Wraps a resolver.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of class names resolved so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map_or(0, |c| c.len())
    }

    /// Returns the wrapped resolver.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: LayerResolver> LayerResolver for CachedLayerResolver<R> {
    fn layers_for_class(&self, class_name: &str) -> Result<Vec<String>, ConfigurationError> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(layers) = cache.get(class_name) {
                return Ok(layers.clone());
            }
        }

        let layers = self.inner.layers_for_class(class_name)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(class_name.to_string(), layers.clone());
        }
        Ok(layers)
    }
}

impl<R: LayerResolver + ?Sized> LayerResolver for &R {
    fn layers_for_class(&self, class_name: &str) -> Result<Vec<String>, ConfigurationError> {
        (**self).layers_for_class(class_name)
    }
}
