//! Disqualifying-issue flags.
//!
//! Config files historically stored these flags as `1`/`0`, `"1"`/`"0"`, or
//! booleans. They are normalized to strict booleans when loaded, so the rest
//! of the validator never has to think about truthiness.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::raw::{describe, OrderedEntries};

/// Built-in baseline used when no configuration names any issues.
pub const DEFAULT_DISQUALIFYING_ISSUES: &[(&str, bool)] = &[
    ("bib_lvl_not_serial", true),
    ("form_not_print", true),
    ("record_type_not_language_material", true),
    ("serial_type_not_periodical", true),
    ("invalid_carrier_type", true),
    ("invalid_media_type", true),
    ("issn_db_form_not_print", true),
    ("issn_db_serial_type_not_periodical", true),
    ("no_oclc_number", true),
    ("no_worldcat_record", true),
    ("binding_words_in_holdings", true),
    ("completeness_words_in_holdings", true),
    ("nonprint_words_in_holdings", true),
    ("title_in_jstor", false),
    ("duplicate_holdings_id", true),
    ("duplicate_local_oclc", true),
    ("duplicate_wc_oclc", true),
    ("holdings_out_of_range", true),
    ("holdings_out_of_issn_db_date_range", true),
    ("holdings_have_no_years", false),
    ("invalid_local_issn", true),
    ("issn_mismatch", true),
    ("local_issn_does_not_match_wc_issn_a", false),
    ("local_issn_does_not_match_issn_db", false),
    ("oclc_mismatch", true),
    ("title_mismatch", true),
    ("line_583_error", true),
    ("marc_validation_error", true),
    ("missing_field_852a", true),
];

/// Mapping from issue category name to whether it disqualifies a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueFlags {
    flags: BTreeMap<String, bool>,
}

impl IssueFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in baseline.
    pub fn builtin_defaults() -> Self {
        DEFAULT_DISQUALIFYING_ISSUES
            .iter()
            .map(|(name, on)| (name.to_string(), *on))
            .collect()
    }

    pub fn set(&mut self, issue: impl Into<String>, enabled: bool) {
        self.flags.insert(issue.into(), enabled);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, issue: impl Into<String>, enabled: bool) -> Self {
        self.set(issue, enabled);
        self
    }

    /// Whether `issue` disqualifies. Unknown issues never do.
    pub fn is_active(&self, issue: &str) -> bool {
        self.flags.get(issue).copied().unwrap_or(false)
    }

    /// Names of all enabled categories.
    pub fn active_categories(&self) -> BTreeSet<String> {
        self.flags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn from_entries(scope: &str, raw: OrderedEntries) -> Result<Self, ConfigError> {
        let mut flags = IssueFlags::new();
        for (issue, value) in raw.0 {
            match parse_flag(&value) {
                Some(enabled) => flags.set(issue, enabled),
                None => {
                    return Err(ConfigError::InvalidFlag {
                        scope: scope.to_string(),
                        issue,
                        value: describe(&value),
                    })
                }
            }
        }
        Ok(flags)
    }
}

impl FromIterator<(String, bool)> for IssueFlags {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

/// Interpret a stored flag value.
///
/// The strings `"0"`, `"false"`, `"no"`, `"off"` and `""` are false even
/// though a non-empty string would otherwise read as set.
fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "no" | "n" | "off" | "" => Some(false),
            _ => None,
        },
        Value::Array(_) | Value::Object(_) => None,
    }
}
