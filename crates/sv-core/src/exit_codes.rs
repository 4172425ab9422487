//! Exit codes for the serials-validator CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use sv_common::Error;

/// Exit codes for serials-validator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything resolved / check passed
    Clean = 0,

    /// Some input files have no configured fields, or a check failed
    Findings = 1,

    /// Configuration error
    ConfigError = 10,

    /// Bad input: unknown folder, malformed year
    InputError = 11,

    /// Output naming gave up
    NamingError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::Findings)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::UnsupportedSchema(_) => ExitCode::ConfigError,
            Error::InvalidYear(_) | Error::InputFolderMissing { .. } => ExitCode::InputError,
            Error::NameCollisionOverflow { .. } => ExitCode::NamingError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping() {
        assert_eq!(
            ExitCode::from(&Error::Config("bad".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from(&Error::InvalidYear("19uu".into())),
            ExitCode::InputError
        );
        assert!(ExitCode::IoError.is_error());
        assert!(!ExitCode::Findings.is_error());
        assert!(ExitCode::Findings.is_success());
        assert_eq!(i32::from(ExitCode::ConfigError), 10);
    }
}
