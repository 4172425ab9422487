//! In-memory configuration stores.
//!
//! Three stores feed policy resolution:
//!
//! - [`PerFileOverrides`]: field sets set up for one specific input file.
//! - [`BulkConfigStore`]: per-institution ("program") fields and issues used
//!   in bulk/headless runs.
//! - [`AliasMap`]: other names an institution's files may arrive under.
//!
//! All keys are lower-cased [`InstitutionKey`]s except per-file overrides,
//! which are keyed by the exact filename.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sv_common::InstitutionKey;

use crate::error::ConfigError;
use crate::fields::FieldSet;
use crate::issues::IssueFlags;

/// Kind of input file a program sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "MARC", alias = "marc", alias = "mrk")]
    Marc,
    #[serde(rename = "spreadsheet", alias = "Spreadsheet")]
    Spreadsheet,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Marc => write!(f, "MARC"),
            FileType::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Bulk configuration for one institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramConfig {
    pub name: InstitutionKey,
    pub file_type: Option<FileType>,
    pub input_fields: FieldSet,
    pub disqualifying_issues: IssueFlags,
    pub associated_names: Vec<InstitutionKey>,
}

impl ProgramConfig {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: InstitutionKey::new(name),
            file_type: None,
            input_fields: FieldSet::new(),
            disqualifying_issues: IssueFlags::new(),
            associated_names: Vec::new(),
        }
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.input_fields = fields;
        self
    }

    pub fn with_issues(mut self, issues: IssueFlags) -> Self {
        self.disqualifying_issues = issues;
        self
    }

    pub fn with_associated_name(mut self, name: impl AsRef<str>) -> Self {
        self.associated_names.push(InstitutionKey::new(name));
        self
    }
}

/// Per-institution bulk configuration.
#[derive(Debug, Clone, Default)]
pub struct BulkConfigStore {
    programs: HashMap<InstitutionKey, ProgramConfig>,
}

impl BulkConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program, keyed by its lower-cased name.
    ///
    /// Names that differ only by case collide.
    pub fn insert(&mut self, program: ProgramConfig) -> Result<(), ConfigError> {
        if self.programs.contains_key(&program.name) {
            return Err(ConfigError::DuplicateProgram {
                name: program.name.to_string(),
            });
        }
        self.programs.insert(program.name.clone(), program);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ProgramConfig> {
        self.programs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.programs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn programs(&self) -> impl Iterator<Item = &ProgramConfig> {
        self.programs.values()
    }
}

/// Alternate institution names mapped to canonical program keys.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<InstitutionKey, InstitutionKey>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` for `canonical`.
    ///
    /// Re-registering the same pair is a no-op; claiming an alias already
    /// owned by another program is an error.
    pub fn insert(
        &mut self,
        alias: impl AsRef<str>,
        canonical: impl AsRef<str>,
    ) -> Result<(), ConfigError> {
        let alias = InstitutionKey::new(alias);
        let canonical = InstitutionKey::new(canonical);
        if let Some(existing) = self.aliases.get(&alias) {
            if *existing == canonical {
                return Ok(());
            }
            return Err(ConfigError::ConflictingAlias {
                alias: alias.to_string(),
                first: existing.to_string(),
                second: canonical.to_string(),
            });
        }
        self.aliases.insert(alias, canonical);
        Ok(())
    }

    /// Canonical program key for an alias.
    pub fn canonical(&self, key: &str) -> Option<&InstitutionKey> {
        self.aliases.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.aliases.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Check every alias against the bulk store.
    pub fn validate(&self, bulk: &BulkConfigStore) -> Result<(), ConfigError> {
        for (alias, target) in &self.aliases {
            if bulk.contains(alias.as_str()) {
                return Err(ConfigError::AliasShadowsProgram {
                    alias: alias.to_string(),
                });
            }
            if !bulk.contains(target.as_str()) {
                return Err(ConfigError::UnknownAliasTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Field sets configured for individual input files.
#[derive(Debug, Clone, Default)]
pub struct PerFileOverrides {
    files: HashMap<String, FieldSet>,
}

impl PerFileOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fields for `filename`. Empty sets are ignored, matching a
    /// file section whose fields were all left blank.
    pub fn insert(&mut self, filename: impl Into<String>, fields: FieldSet) {
        if fields.is_empty() {
            return;
        }
        self.files.insert(filename.into(), fields);
    }

    pub fn get(&self, filename: &str) -> Option<&FieldSet> {
        self.files.get(filename)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk_with(names: &[&str]) -> BulkConfigStore {
        let mut bulk = BulkConfigStore::new();
        for name in names {
            bulk.insert(ProgramConfig::new(name)).unwrap();
        }
        bulk
    }

    #[test]
    fn bulk_keys_are_lowercased() {
        let bulk = bulk_with(&["Yale"]);
        assert!(bulk.contains("yale"));
        assert!(!bulk.contains("Yale"));
    }

    #[test]
    fn programs_differing_by_case_collide() {
        let mut bulk = bulk_with(&["yale"]);
        let err = bulk.insert(ProgramConfig::new("YALE")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProgram { ref name } if name == "yale"));
        assert_eq!(bulk.len(), 1);
    }

    #[test]
    fn alias_lookup_is_lowercased() {
        let mut aliases = AliasMap::new();
        aliases.insert("YUL", "Yale").unwrap();
        assert_eq!(aliases.canonical("yul").map(|k| k.as_str()), Some("yale"));
    }

    #[test]
    fn alias_conflicts_are_rejected() {
        let mut aliases = AliasMap::new();
        aliases.insert("uc", "ucla").unwrap();
        aliases.insert("uc", "UCLA").unwrap();
        let err = aliases.insert("uc", "ucsd").unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingAlias { .. }));
    }

    #[test]
    fn validate_catches_dangling_and_shadowing_aliases() {
        let bulk = bulk_with(&["yale", "harvard"]);

        let mut dangling = AliasMap::new();
        dangling.insert("mit", "mit_libraries").unwrap();
        assert!(matches!(
            dangling.validate(&bulk),
            Err(ConfigError::UnknownAliasTarget { .. })
        ));

        let mut shadowing = AliasMap::new();
        shadowing.insert("harvard", "yale").unwrap();
        assert!(matches!(
            shadowing.validate(&bulk),
            Err(ConfigError::AliasShadowsProgram { .. })
        ));

        let mut ok = AliasMap::new();
        ok.insert("yul", "yale").unwrap();
        assert!(ok.validate(&bulk).is_ok());
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut overrides = PerFileOverrides::new();
        overrides.insert("a.mrk", FieldSet::new());
        overrides.insert("b.mrk", FieldSet::new().with("oclc", "035a"));
        assert!(overrides.get("a.mrk").is_none());
        assert!(overrides.get("b.mrk").is_some());
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn file_type_serde_names() {
        let marc: FileType = serde_json::from_str("\"MARC\"").unwrap();
        let sheet: FileType = serde_json::from_str("\"Spreadsheet\"").unwrap();
        assert_eq!(marc, FileType::Marc);
        assert_eq!(sheet, FileType::Spreadsheet);
        assert_eq!(serde_json::to_string(&FileType::Marc).unwrap(), "\"MARC\"");
    }
}
