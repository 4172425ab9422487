//! Serials Validator common types, keys, and errors.
//!
//! This crate provides foundational types shared across sv-core modules:
//! - Institution keys derived from input filenames
//! - Schema versioning for configuration documents
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use id::{institution_key, InstitutionKey};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
