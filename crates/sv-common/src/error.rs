//! Error types for the Serials Validator.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Serials Validator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Serials Validator.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported configuration schema version: {0}")]
    UnsupportedSchema(String),

    // Input data errors (20-29)
    #[error("invalid year: {0:?}")]
    InvalidYear(String),

    #[error("input folder not found: {}", path.display())]
    InputFolderMissing { path: PathBuf },

    // Output naming errors (30-39)
    #[error("at least {attempts} files with the base name {}; runaway process?", path.display())]
    NameCollisionOverflow { path: PathBuf, attempts: u32 },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnsupportedSchema(_) => 11,
            Error::InvalidYear(_) => 20,
            Error::InputFolderMissing { .. } => 21,
            Error::NameCollisionOverflow { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether this error originates in configuration loading.
    pub fn is_config(&self) -> bool {
        (10..20).contains(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_category() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert!(Error::UnsupportedSchema("9.0.0".into()).is_config());
        assert!(!Error::InvalidYear("19xx".into()).is_config());
        let overflow = Error::NameCollisionOverflow {
            path: PathBuf::from("out.tsv"),
            attempts: 999,
        };
        assert_eq!(overflow.code(), 30);
    }

    #[test]
    fn overflow_message_names_the_file() {
        let err = Error::NameCollisionOverflow {
            path: PathBuf::from("report.xlsx"),
            attempts: 999,
        };
        let msg = err.to_string();
        assert!(msg.contains("report.xlsx"));
        assert!(msg.contains("999"));
    }
}
