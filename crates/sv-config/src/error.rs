//! Errors raised while loading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or normalizing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config schema version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid flag value {value} for disqualifying issue {issue:?} in {scope}")]
    InvalidFlag {
        scope: String,
        issue: String,
        value: String,
    },

    #[error("invalid value {value} for input field {field:?} in {scope}")]
    InvalidField {
        scope: String,
        field: String,
        value: String,
    },

    #[error("program {name:?} is configured more than once")]
    DuplicateProgram { name: String },

    #[error("alias {alias:?} points to unknown program {target:?}")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("alias {alias:?} is also configured as a program")]
    AliasShadowsProgram { alias: String },

    #[error("alias {alias:?} is claimed by both {first:?} and {second:?}")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },
}

impl From<ConfigError> for sv_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnsupportedVersion(version) => sv_common::Error::UnsupportedSchema(version),
            ConfigError::Io { source, .. } => sv_common::Error::Io(source),
            other => sv_common::Error::Config(other.to_string()),
        }
    }
}
