//! The validator configuration document.
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "disqualifying_issues": { "title_in_jstor": 0, "issn_mismatch": 1 },
//!   "files": {
//!     "ABC_2021.mrk": { "input_fields": { "oclc": "35a", "holdings_1": "866" } }
//!   },
//!   "programs": {
//!     "abc": {
//!       "file_type": "MARC",
//!       "associated_names": ["abc_library"],
//!       "input_fields": { "oclc": "035a" },
//!       "disqualifying_issues": { "title_mismatch": 0 }
//!     }
//!   },
//!   "aliases": { "abcl": "abc" }
//! }
//! ```
//!
//! Every section is optional. Loading normalizes flag truthiness, trims and
//! zero-fills field tags, lower-cases institution names, and checks aliases,
//! producing a [`ValidatorConfig`] that is read-only from then on.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use sv_common::schema::is_compatible;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::fields::FieldSet;
use crate::issues::IssueFlags;
use crate::raw::OrderedEntries;
use crate::store::{AliasMap, BulkConfigStore, FileType, PerFileOverrides, ProgramConfig};

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(default = "default_schema_version")]
    schema_version: String,

    #[serde(default)]
    disqualifying_issues: Option<OrderedEntries>,

    #[serde(default)]
    files: BTreeMap<String, FileSection>,

    #[serde(default)]
    programs: BTreeMap<String, ProgramSection>,

    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FileSection {
    #[serde(default)]
    input_fields: OrderedEntries,
}

#[derive(Debug, Deserialize)]
struct ProgramSection {
    #[serde(default)]
    file_type: Option<FileType>,

    #[serde(default)]
    associated_names: Vec<String>,

    #[serde(default)]
    input_fields: OrderedEntries,

    #[serde(default)]
    disqualifying_issues: OrderedEntries,
}

/// Immutable, fully normalized configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    overrides: PerFileOverrides,
    bulk: BulkConfigStore,
    aliases: AliasMap,
    disqualifying_issues: Option<IssueFlags>,
}

impl ValidatorConfig {
    /// Assemble a configuration from already-built stores.
    pub fn new(
        overrides: PerFileOverrides,
        bulk: BulkConfigStore,
        aliases: AliasMap,
        disqualifying_issues: Option<IssueFlags>,
    ) -> Result<Self, ConfigError> {
        aliases.validate(&bulk)?;
        Ok(Self {
            overrides,
            bulk,
            aliases,
            disqualifying_issues,
        })
    }

    /// Parse and normalize a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Load from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            programs = config.bulk.len(),
            aliases = config.aliases.len(),
            files = config.overrides.len(),
            "loaded validator configuration"
        );
        Ok(config)
    }

    /// Load from `path` if one was resolved; otherwise start empty, which
    /// leaves only the built-in issue defaults in effect.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                info!("no validator configuration found; using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_document(doc: ConfigDocument) -> Result<Self, ConfigError> {
        if !is_compatible(&doc.schema_version) {
            return Err(ConfigError::UnsupportedVersion(doc.schema_version));
        }

        let mut overrides = PerFileOverrides::new();
        for (filename, section) in doc.files {
            let mut fields = FieldSet::from_entries(&filename, section.input_fields)?;
            if filename.ends_with("mrk") {
                fields = fields.zero_filled();
            }
            debug!(file = %filename, fields = fields.len(), "per-file fields");
            overrides.insert(filename, fields);
        }

        let mut bulk = BulkConfigStore::new();
        let mut aliases = AliasMap::new();
        for (name, section) in doc.programs {
            let mut fields = FieldSet::from_entries(&name, section.input_fields)?;
            if section.file_type == Some(FileType::Marc) {
                fields = fields.zero_filled();
            }
            let issues = IssueFlags::from_entries(&name, section.disqualifying_issues)?;
            let mut program = ProgramConfig::new(&name).with_fields(fields).with_issues(issues);
            program.file_type = section.file_type;
            for associated in &section.associated_names {
                aliases.insert(associated, &name)?;
                program = program.with_associated_name(associated);
            }
            bulk.insert(program)?;
        }
        for (alias, target) in &doc.aliases {
            aliases.insert(alias, target)?;
        }

        let disqualifying_issues = doc
            .disqualifying_issues
            .map(|raw| IssueFlags::from_entries("disqualifying_issues", raw))
            .transpose()?;

        Self::new(overrides, bulk, aliases, disqualifying_issues)
    }

    pub fn overrides(&self) -> &PerFileOverrides {
        &self.overrides
    }

    pub fn bulk(&self) -> &BulkConfigStore {
        &self.bulk
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Global disqualifying issues, if the document set any.
    pub fn disqualifying_issues(&self) -> Option<&IssueFlags> {
        self.disqualifying_issues.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "schema_version": "1.0.0",
        "disqualifying_issues": { "title_in_jstor": "1", "issn_mismatch": 0 },
        "files": {
            "ABC_2021.mrk": { "input_fields": { "oclc": "35a", "holdings_1": "866", "issn": "" } },
            "xyz.tsv": { "input_fields": { "oclc": "3", "title": "4" } },
            "blank.tsv": { "input_fields": { "oclc": "" } }
        },
        "programs": {
            "ABC": {
                "file_type": "MARC",
                "associated_names": ["ABC_Library"],
                "input_fields": { "oclc": "35a", "local_id": 1 },
                "disqualifying_issues": { "title_mismatch": 0, "oclc_mismatch": 1 }
            },
            "xyz": {
                "file_type": "spreadsheet",
                "input_fields": { "oclc": 3 }
            }
        },
        "aliases": { "xyz-univ": "XYZ" }
    }"#;

    #[test]
    fn loads_all_sections() {
        let config = ValidatorConfig::from_json(SAMPLE).unwrap();

        let abc = config.bulk().get("abc").expect("abc program");
        assert_eq!(abc.file_type, Some(FileType::Marc));
        assert_eq!(abc.input_fields.get("oclc"), Some("035a"));
        assert_eq!(abc.input_fields.get("local_id"), Some("001"));
        assert!(abc.disqualifying_issues.is_active("oclc_mismatch"));
        assert!(!abc.disqualifying_issues.is_active("title_mismatch"));

        assert_eq!(
            config.aliases().canonical("abc_library").map(|k| k.as_str()),
            Some("abc")
        );
        assert_eq!(
            config.aliases().canonical("xyz-univ").map(|k| k.as_str()),
            Some("xyz")
        );

        let global = config.disqualifying_issues().expect("global issues");
        assert!(global.is_active("title_in_jstor"));
        assert!(!global.is_active("issn_mismatch"));
    }

    #[test]
    fn per_file_mrk_fields_are_zero_filled() {
        let config = ValidatorConfig::from_json(SAMPLE).unwrap();
        let fields = config.overrides().get("ABC_2021.mrk").unwrap();
        let got: Vec<&str> = fields.locations().collect();
        assert_eq!(got, vec!["035a", "866"]);

        let sheet = config.overrides().get("xyz.tsv").unwrap();
        assert_eq!(sheet.get("oclc"), Some("3"));
        assert!(config.overrides().get("blank.tsv").is_none());
    }

    #[test]
    fn empty_document_is_valid() {
        let config = ValidatorConfig::from_json("{}").unwrap();
        assert!(config.bulk().is_empty());
        assert!(config.aliases().is_empty());
        assert!(config.overrides().is_empty());
        assert!(config.disqualifying_issues().is_none());
    }

    #[test]
    fn dangling_alias_is_an_error() {
        let err = ValidatorConfig::from_json(r#"{"aliases": {"a": "nowhere"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAliasTarget { .. }));
    }

    #[test]
    fn incompatible_schema_is_rejected() {
        let err = ValidatorConfig::from_json(r#"{"schema_version": "2.0.0"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion(v) if v == "2.0.0"));
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("validator_config.json");
        fs::write(&path, SAMPLE).unwrap();
        let config = ValidatorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.bulk().len(), 2);

        let missing = dir.path().join("missing.json");
        let err = ValidatorConfig::load_from_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let empty = ValidatorConfig::load_optional(None).unwrap();
        assert!(empty.bulk().is_empty());
    }
}
