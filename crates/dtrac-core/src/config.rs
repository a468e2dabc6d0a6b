//! Depfile: the TOML configuration declaring layers and the ruleset.
//!
//! ```toml
//! [analyzer]
//! class_map = "class-map.json"
//!
//! [[layers]]
//! name = "Controller"
//! [[layers.collectors]]
//! type = "className"
//! regex = "^App\\\\Controller\\\\"
//!
//! [ruleset]
//! Controller = ["Service"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::collector::CollectorFactory;
use crate::error::ConfigurationError;
use crate::layer::Layer;
use crate::ruleset::Ruleset;

/// Default file name of the class map hand-off.
pub const DEFAULT_CLASS_MAP: &str = "class-map.json";

/// Settings for a run that are not part of the architecture itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerSection {
    /// Class map location, relative to the depfile's directory.
    #[serde(default = "default_class_map")]
    pub class_map: PathBuf,

    /// Preferred output format (`text`, `compact`, `json`, `dot`).
    #[serde(default)]
    pub formatter: Option<String>,
}

impl Default for AnalyzerSection {
    fn default() -> Self {
        Self {
            class_map: default_class_map(),
            formatter: None,
        }
    }
}

fn default_class_map() -> PathBuf {
    PathBuf::from(DEFAULT_CLASS_MAP)
}

/// A parsed depfile.
///
/// [`Depfile::parse`] only checks the TOML shape; call
/// [`Depfile::validate`] before evaluating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Depfile {
    /// `[analyzer]` section.
    #[serde(default)]
    pub analyzer: AnalyzerSection,

    /// Layers in declaration order.
    #[serde(default)]
    pub layers: Vec<Layer>,

    /// Allowed layer dependencies.
    #[serde(default)]
    pub ruleset: Ruleset,
}

impl Depfile {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Parse {
            message: e.to_string(),
        })
    }

    /// Check layers, collectors and ruleset for consistency.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self, factory: &CollectorFactory) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();

        for (index, layer) in self.layers.iter().enumerate() {
            if layer.name.trim().is_empty() {
                return Err(ConfigurationError::InvalidLayer {
                    index,
                    reason: "name must not be empty".to_string(),
                });
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(ConfigurationError::DuplicateLayer {
                    name: layer.name.clone(),
                });
            }
            if layer.collectors.is_empty() {
                return Err(ConfigurationError::InvalidLayer {
                    index,
                    reason: format!("layer `{}` has no collectors", layer.name),
                });
            }
            for collector in &layer.collectors {
                factory.validate(collector)?;
            }
        }

        self.ruleset.validate(&self.layers)
    }

    /// Looks up a layer by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Class map path resolved against the directory holding the depfile.
    #[must_use]
    pub fn class_map_path(&self, base_dir: &Path) -> PathBuf {
        if self.analyzer.class_map.is_absolute() {
            self.analyzer.class_map.clone()
        } else {
            base_dir.join(&self.analyzer.class_map)
        }
    }
}
