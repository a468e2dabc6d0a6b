//! Error types shared across the analysis pipeline.

use miette::Diagnostic;
use std::path::PathBuf;

/// A malformed depfile, layer, collector, or ruleset definition.
///
/// Configuration errors are fatal: they abort a run before any violation
/// is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ConfigurationError {
    /// A collector fragment has no value for a required key.
    #[error("collector `{collector}`: missing required parameter `{key}`")]
    #[diagnostic(
        code(dtrac::config::missing_parameter),
        help("every collector table needs a `type` key plus the parameters of that type")
    )]
    MissingParameter {
        /// Collector type (or `collector` when the type itself is missing).
        collector: String,
        /// The absent key.
        key: String,
    },

    /// A collector parameter is present but unusable.
    #[error("collector `{collector}`: invalid parameter `{key}`: {reason}")]
    #[diagnostic(code(dtrac::config::invalid_parameter))]
    InvalidParameter {
        /// Collector type.
        collector: String,
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The `type` discriminator names no registered collector.
    #[error("unknown collector type `{kind}` (registered: {known})")]
    #[diagnostic(code(dtrac::config::unknown_collector))]
    UnknownCollectorType {
        /// The unregistered type tag.
        kind: String,
        /// Comma-separated list of registered tags.
        known: String,
    },

    /// The ruleset references a layer that is not declared.
    #[error("{context}: unknown layer `{name}`")]
    #[diagnostic(code(dtrac::config::unknown_layer))]
    UnknownLayer {
        /// Where the reference was found.
        context: String,
        /// The undeclared layer name.
        name: String,
    },

    /// Two layers share a name.
    #[error("layer `{name}` is declared more than once")]
    #[diagnostic(code(dtrac::config::duplicate_layer))]
    DuplicateLayer {
        /// The repeated name.
        name: String,
    },

    /// A layer definition is structurally invalid.
    #[error("layers[{index}]: {reason}")]
    #[diagnostic(code(dtrac::config::invalid_layer))]
    InvalidLayer {
        /// Position in the `[[layers]]` array.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The depfile could not be read.
    #[error("failed to read {path}: {message}")]
    #[diagnostic(code(dtrac::config::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error detail.
        message: String,
    },

    /// The depfile is not valid TOML or does not match the expected shape.
    #[error("invalid depfile: {message}")]
    #[diagnostic(code(dtrac::config::parse))]
    Parse {
        /// Parse error detail.
        message: String,
    },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::MissingParameter`].
    #[must_use]
    pub fn missing(collector: &str, key: &str) -> Self {
        Self::MissingParameter {
            collector: collector.to_string(),
            key: key.to_string(),
        }
    }

    /// Shorthand for [`ConfigurationError::InvalidParameter`].
    #[must_use]
    pub fn invalid(collector: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            collector: collector.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors loading the class map handed over by the parsing layer.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ClassMapError {
    /// Failed to read the class map file.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(dtrac::class_map::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// The class map is not valid JSON or has the wrong shape.
    #[error("invalid class map: {0}")]
    #[diagnostic(code(dtrac::class_map::json))]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_message_names_collector_and_key() {
        let err = ConfigurationError::missing("className", "regex");
        assert_eq!(
            err.to_string(),
            "collector `className`: missing required parameter `regex`"
        );
    }

    #[test]
    fn unknown_collector_type_has_diagnostic_code() {
        let err = ConfigurationError::UnknownCollectorType {
            kind: "directory".into(),
            known: "className, extends".into(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("dtrac::config::unknown_collector"));
        assert!(err.to_string().contains("directory"));
    }
}
