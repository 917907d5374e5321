//! JD-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, JdError>;

/// Top-level error type for the joint dashboard.
#[derive(Debug, Error)]
pub enum JdError {
    #[error("[JD-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[JD-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[JD-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[JD-1101] invalid parameter {name:?}: {details}")]
    InvalidParameter { name: String, details: String },

    #[error("[JD-2001] mutation hook failed for {name:?}: {details}")]
    Hook { name: String, details: String },

    #[error("[JD-2002] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[JD-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[JD-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[JD-3002] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl JdError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "JD-1001",
            Self::MissingConfig { .. } => "JD-1002",
            Self::ConfigParse { .. } => "JD-1003",
            Self::InvalidParameter { .. } => "JD-1101",
            Self::Hook { .. } => "JD-2001",
            Self::ChannelClosed { .. } => "JD-2002",
            Self::Serialization { .. } => "JD-2101",
            Self::Io { .. } => "JD-3001",
            Self::Terminal { .. } => "JD-3002",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for hook failures.
    #[must_use]
    pub fn hook(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Hook {
            name: name.into(),
            details: details.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &str, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for JdError {
    fn from(source: std::io::Error) -> Self {
        Self::Terminal { source }
    }
}

impl From<serde_json::Error> for JdError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for JdError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
