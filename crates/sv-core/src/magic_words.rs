//! "Magic word" detection in holdings statements and notes.
//!
//! Holdings text frequently says more than its enumeration: `v.1-5 (incomplete)`,
//! `bd. w/ v.6`, `also on DVD`. Each [`MagicWordCondition`] owns a fixed list of
//! case-insensitive fragments; a condition is flagged when any fragment
//! appears in the holdings statement, the nonpublic note, or the public note.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker written to report columns for a flagged condition.
pub const FLAGGED_MARKER: &str = "1";

/// Marker written to report columns for an unflagged condition.
pub const CLEAR_MARKER: &str = "";

const COMPLETENESS_FRAGMENTS: &[&str] = &["inc", "compl", "miss", "lack", "without", "w/o", "repr"];
const BINDING_FRAGMENTS: &[&str] = &["bound", r"bd\.? w"];
const NONPRINT_FRAGMENTS: &[&str] = &[r"d\.?v\.?d\.?", r"\bc\.?d\.?\b"];

static COMPLETENESS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(COMPLETENESS_FRAGMENTS));
static BINDING: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(BINDING_FRAGMENTS));
static NONPRINT: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(NONPRINT_FRAGMENTS));

fn compile(fragments: &[&str]) -> Vec<Regex> {
    fragments
        .iter()
        .map(|f| Regex::new(f).expect("static magic-word fragment"))
        .collect()
}

/// Textual conditions that can be detected in holdings data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagicWordCondition {
    /// Gaps, missing or lacking issues, reprints.
    Completeness,
    /// Issues bound with other material.
    Binding,
    /// Non-print media such as DVDs or CDs.
    Nonprint,
}

impl MagicWordCondition {
    pub const ALL: [MagicWordCondition; 3] = [
        MagicWordCondition::Completeness,
        MagicWordCondition::Binding,
        MagicWordCondition::Nonprint,
    ];

    /// Regex fragments for this condition, in match order.
    pub fn fragments(self) -> &'static [&'static str] {
        match self {
            Self::Completeness => COMPLETENESS_FRAGMENTS,
            Self::Binding => BINDING_FRAGMENTS,
            Self::Nonprint => NONPRINT_FRAGMENTS,
        }
    }

    /// Disqualifying issue raised when this condition is found.
    pub fn issue_name(self) -> &'static str {
        match self {
            Self::Completeness => "completeness_words_in_holdings",
            Self::Binding => "binding_words_in_holdings",
            Self::Nonprint => "nonprint_words_in_holdings",
        }
    }

    fn patterns(self) -> &'static [Regex] {
        match self {
            Self::Completeness => &COMPLETENESS,
            Self::Binding => &BINDING,
            Self::Nonprint => &NONPRINT,
        }
    }

    /// Whether `text` contains any fragment of this condition.
    pub fn matches(self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.patterns().iter().any(|re| re.is_match(&lowered))
    }
}

impl fmt::Display for MagicWordCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completeness => write!(f, "completeness"),
            Self::Binding => write!(f, "binding"),
            Self::Nonprint => write!(f, "nonprint"),
        }
    }
}

/// Error for an unknown condition name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown magic-word condition: {0:?} (expected completeness, binding, or nonprint)")]
pub struct UnknownCondition(pub String);

impl FromStr for MagicWordCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completeness" => Ok(Self::Completeness),
            "binding" => Ok(Self::Binding),
            "nonprint" => Ok(Self::Nonprint),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}

/// Whether any of the three holdings text fields shows `condition`.
///
/// Absent and blank fields are skipped.
pub fn classify(
    holdings: Option<&str>,
    nonpublic_note: Option<&str>,
    public_note: Option<&str>,
    condition: MagicWordCondition,
) -> bool {
    [holdings, nonpublic_note, public_note]
        .into_iter()
        .flatten()
        .filter(|segment| !segment.trim().is_empty())
        .any(|segment| condition.matches(segment))
}

/// [`classify`] rendered as a report marker: `"1"` when flagged, `""` when not.
pub fn classify_marker(
    holdings: Option<&str>,
    nonpublic_note: Option<&str>,
    public_note: Option<&str>,
    condition: MagicWordCondition,
) -> &'static str {
    if classify(holdings, nonpublic_note, public_note, condition) {
        FLAGGED_MARKER
    } else {
        CLEAR_MARKER
    }
}

/// All three conditions for one holdings record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MagicWordFlags {
    pub completeness: bool,
    pub binding: bool,
    pub nonprint: bool,
}

impl MagicWordFlags {
    pub fn get(&self, condition: MagicWordCondition) -> bool {
        match condition {
            MagicWordCondition::Completeness => self.completeness,
            MagicWordCondition::Binding => self.binding,
            MagicWordCondition::Nonprint => self.nonprint,
        }
    }

    /// Disqualifying issue names for the flagged conditions.
    pub fn issue_names(&self) -> Vec<&'static str> {
        MagicWordCondition::ALL
            .into_iter()
            .filter(|c| self.get(*c))
            .map(MagicWordCondition::issue_name)
            .collect()
    }
}

/// Check every condition at once.
pub fn classify_all(
    holdings: Option<&str>,
    nonpublic_note: Option<&str>,
    public_note: Option<&str>,
) -> MagicWordFlags {
    let check = |c| classify(holdings, nonpublic_note, public_note, c);
    MagicWordFlags {
        completeness: check(MagicWordCondition::Completeness),
        binding: check(MagicWordCondition::Binding),
        nonprint: check(MagicWordCondition::Nonprint),
    }
}
