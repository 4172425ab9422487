//! Slash-year reconciliation for holdings date checks.
//!
//! Serials holdings often straddle years: `1965/66`, `2000-2001`, `v.3 (1999/00)`.
//! When such a statement is checked against a bibliographic date range, the
//! year pulled out of it may be either side of the slash. These functions
//! re-scan the original text and pick the reading that gives the holdings the
//! benefit of the doubt:
//!
//! - a bibliographic **start** and a holdings **end** take their *earliest*
//!   plausible reading ([`resolve_earlier`]);
//! - a bibliographic **end** and a holdings **start** take their *latest*
//!   plausible reading ([`resolve_later`]).
//!
//! A correction is only made when the text supports it; otherwise the
//! nominal year is returned unchanged.

use regex::Regex;
use sv_common::{Error, Result};
use tracing::{trace, warn};

/// Plausible full years: 1600–2020. Digits are ASCII only; `\d` would also
/// match digits from other scripts, which `u32::from_str` rejects.
const YEAR_PATTERN: &str = r"(?:1[6789][0-9][0-9]|20[01][0-9]|2020)";

/// Plausible second half of a slash year: a full year or a bare two-digit suffix.
const SECOND_YEAR_PATTERN: &str = r"(?:1[6789][0-9][0-9]|20[01][0-9]|2020|[0-9][0-9])";

/// Parse a year held as text.
///
/// The reconciliation functions take integers; callers holding years as
/// strings go through here so a malformed year is caught before any
/// comparison is attempted.
pub fn parse_year(year: &str) -> Result<u32> {
    let trimmed = year.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidYear(year.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| Error::InvalidYear(year.to_string()))
}

/// Earliest reading of `year` supported by `text`.
///
/// Looks for `<candidate> [-/] <year>` where the second half may also be the
/// last two digits of `year`, e.g. `2000/01` for 2001. Returns the candidate
/// if it is earlier than `year`.
pub fn resolve_earlier(year: u32, text: &str) -> u32 {
    let full = year.to_string();
    let ending = match full.get(2..).filter(|s| !s.is_empty()) {
        Some(short) => format!("{full}|{short}"),
        None => full.clone(),
    };
    let Some(re) = compile(&format!(r"({YEAR_PATTERN}) *[-/] *(?:{ending})")) else {
        return year;
    };
    match re.captures(text).and_then(|caps| caps[1].parse::<u32>().ok()) {
        Some(found) if found < year => {
            trace!(year, found, text, "slash year moved earlier");
            found
        }
        _ => year,
    }
}

/// Latest reading of `year` supported by `text`.
///
/// Looks for `<year> [-/] <candidate>`. A two-digit candidate is read in the
/// same century as `year`, so `2000/01` gives 2001. Returns the candidate if
/// it is later than `year`.
pub fn resolve_later(year: u32, text: &str) -> u32 {
    let full = year.to_string();
    let Some(re) = compile(&format!(r"{full} *[-/] *({SECOND_YEAR_PATTERN})\b")) else {
        return year;
    };
    let Some(caps) = re.captures(text) else {
        return year;
    };
    let second = &caps[1];
    let expanded = if second.len() == 2 {
        let century = full.get(..2).unwrap_or(&full);
        format!("{century}{second}")
    } else {
        second.to_string()
    };
    match expanded.parse::<u32>() {
        Ok(found) if found > year => {
            trace!(year, found, text, "slash year moved later");
            found
        }
        _ => year,
    }
}

/// Whether a holdings start year can be on or after the bibliographic start.
///
/// Compares the latest reading of the holdings year against the earliest
/// reading of the bibliographic year.
pub fn start_dates_compatible(
    bib_year: u32,
    bib_text: &str,
    holdings_year: u32,
    holdings_text: &str,
) -> bool {
    let bib_year = resolve_earlier(bib_year, bib_text);
    let holdings_year = resolve_later(holdings_year, holdings_text);
    holdings_year >= bib_year
}

/// Whether a holdings end year can be on or before the bibliographic end.
///
/// Compares the earliest reading of the holdings year against the latest
/// reading of the bibliographic year.
pub fn end_dates_compatible(
    bib_year: u32,
    bib_text: &str,
    holdings_year: u32,
    holdings_text: &str,
) -> bool {
    let holdings_year = resolve_earlier(holdings_year, holdings_text);
    let bib_year = resolve_later(bib_year, bib_text);
    holdings_year <= bib_year
}

/// A nominal year and the text it was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan<'a> {
    pub year: u32,
    pub text: &'a str,
}

impl<'a> YearSpan<'a> {
    pub fn new(year: u32, text: &'a str) -> Self {
        Self { year, text }
    }

    /// Build from a year held as text.
    pub fn parse(year: &str, text: &'a str) -> Result<Self> {
        Ok(Self::new(parse_year(year)?, text))
    }

    pub fn earliest(&self) -> u32 {
        resolve_earlier(self.year, self.text)
    }

    pub fn latest(&self) -> u32 {
        resolve_later(self.year, self.text)
    }

    /// Treating `self` as a holdings start, check it against a bib start.
    pub fn starts_within(&self, bib_start: &YearSpan<'_>) -> bool {
        start_dates_compatible(bib_start.year, bib_start.text, self.year, self.text)
    }

    /// Treating `self` as a holdings end, check it against a bib end.
    pub fn ends_within(&self, bib_end: &YearSpan<'_>) -> bool {
        end_dates_compatible(bib_end.year, bib_end.text, self.year, self.text)
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "slash-year pattern failed to compile");
            None
        }
    }
}
