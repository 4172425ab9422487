//! Input field sets.
//!
//! A [`FieldSet`] names, in configured order, where each category of data
//! lives in an institution's input files: a MARC tag and subfield such as
//! `035a` for MARC files, or a column number for spreadsheets.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::raw::{describe, OrderedEntries};

static TAG_WITH_SUBFIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *([0-9]+)([a-z]) *$").expect("static tag pattern"));

/// One configured field: the data category and where to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Data category, e.g. `oclc`, `holdings_1`, `issn`.
    pub category: String,
    /// Field identifier in the input file, e.g. `035a` or `4`.
    pub location: String,
}

/// Ordered set of fields to validate for one institution or file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    entries: Vec<FieldEntry>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping configured order.
    pub fn push(&mut self, category: impl Into<String>, location: impl Into<String>) {
        self.entries.push(FieldEntry {
            category: category.into(),
            location: location.into(),
        });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, category: impl Into<String>, location: impl Into<String>) -> Self {
        self.push(category, location);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    /// Field identifiers in configured order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.location.as_str())
    }

    /// Location configured for a category, if any. First entry wins.
    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.location.as_str())
    }

    /// Copy of this set with MARC tags zero-filled to three digits.
    pub fn zero_filled(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| FieldEntry {
                    category: e.category.clone(),
                    location: zero_fill_marc_field(&e.location),
                })
                .collect(),
        }
    }

    /// Normalize raw configuration entries.
    ///
    /// Strings are trimmed and integers stringified; a float with no
    /// fractional part (`3.0`, as spreadsheet exports write column numbers)
    /// counts as an integer. Blank values and nulls mean "not present in
    /// this file" and are dropped.
    pub(crate) fn from_entries(scope: &str, raw: OrderedEntries) -> Result<Self, ConfigError> {
        let mut set = FieldSet::new();
        for (category, value) in raw.0 {
            let location = match &value {
                Value::Null => continue,
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
                Value::Number(n) => match integral(n) {
                    Some(whole) => whole.to_string(),
                    None => {
                        return Err(ConfigError::InvalidField {
                            scope: scope.to_string(),
                            field: category,
                            value: describe(&value),
                        })
                    }
                },
                Value::Bool(b) => u8::from(*b).to_string(),
                other => {
                    return Err(ConfigError::InvalidField {
                        scope: scope.to_string(),
                        field: category,
                        value: describe(other),
                    })
                }
            };
            if location.is_empty() {
                continue;
            }
            set.push(category, location);
        }
        Ok(set)
    }
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Zero-fill a numeric field number to three digits.
///
/// Field numbers that passed through SQLite or a spreadsheet come back as
/// integers, so `004` arrives as `4`. Non-numeric values are returned as-is.
pub fn left_pad_field_number(field_number: &str) -> String {
    if field_number.is_empty() || !field_number.chars().all(|c| c.is_ascii_digit()) {
        return field_number.to_string();
    }
    format!("{field_number:0>3}")
}

/// Zero-fill a MARC field tag.
///
/// `4` becomes `004` and `35a` becomes `035a`; anything that is not a bare
/// tag or a tag followed by one subfield letter is returned unchanged.
pub fn zero_fill_marc_field(field: &str) -> String {
    if field.is_empty() || field.chars().all(|c| c.is_ascii_digit()) {
        return left_pad_field_number(field);
    }
    let lowered = field.to_lowercase();
    match TAG_WITH_SUBFIELD.captures(&lowered) {
        Some(caps) => format!("{:0>3}{}", &caps[1], &caps[2]),
        None => field.to_string(),
    }
}
