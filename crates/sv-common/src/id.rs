//! Institution identity types.
//!
//! Every piece of institution-scoped configuration is keyed by an
//! [`InstitutionKey`]: the lower-cased leading part of an input file's name.
//! `ABC.2021.mrk`, `abc_holdings.tsv` and `/input/Abc.xlsx` resolve to the
//! keys `abc`, `abc_holdings` and `abc` respectively.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Lower-cased institution lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionKey(String);

impl InstitutionKey {
    /// Create a key from an institution or program name, lower-casing it.
    pub fn new(name: impl AsRef<str>) -> Self {
        InstitutionKey(name.as_ref().trim().to_lowercase())
    }

    /// Derive the key for an input filename.
    ///
    /// Takes the final path segment, cuts it at the first period and
    /// lower-cases the rest. Any string produces a key, possibly empty.
    pub fn from_filename(filename: &str) -> Self {
        let file_proper = filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default();
        let stem = file_proper.split('.').next().unwrap_or_default();
        InstitutionKey(stem.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for InstitutionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstitutionKey {
    fn from(name: &str) -> Self {
        InstitutionKey::new(name)
    }
}

/// Derive the institution key for a filename.
pub fn institution_key(filename: &str) -> InstitutionKey {
    InstitutionKey::from_filename(filename)
}
