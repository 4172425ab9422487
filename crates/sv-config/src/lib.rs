//! Serials Validator configuration loading and normalization.
//!
//! This crate provides:
//! - Typed field sets and disqualifying-issue flags
//! - The per-file override, per-institution bulk, and alias stores
//! - Loading of the JSON configuration document into immutable stores
//! - Config path resolution (CLI → env → data folder → user config dir)

pub mod error;
pub mod fields;
pub mod issues;
mod raw;
pub mod resolve;
pub mod store;
pub mod validator_config;

pub use error::ConfigError;
pub use fields::{left_pad_field_number, zero_fill_marc_field, FieldEntry, FieldSet};
pub use issues::{IssueFlags, DEFAULT_DISQUALIFYING_ISSUES};
pub use resolve::{resolve_config_path, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use store::{AliasMap, BulkConfigStore, FileType, PerFileOverrides, ProgramConfig};
pub use validator_config::ValidatorConfig;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = sv_common::SCHEMA_VERSION;
