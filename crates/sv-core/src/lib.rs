//! Serials Validator core: policy resolution and holdings-date reconciliation.
//!
//! - [`policy`]: which fields to read and which issues disqualify, per file
//! - [`years`]: slash-year reconciliation for holdings/bib date checks
//! - [`magic_words`]: completeness, binding, and non-print words in holdings
//! - [`filenames`]: institution keys, display abbreviations, unique output paths
//! - [`input_files`], [`jstor`], [`marc_fields`]: input-side helpers
//! - [`logging`], [`exit_codes`]: process plumbing for the CLI

pub mod exit_codes;
pub mod filenames;
pub mod input_files;
pub mod jstor;
pub mod logging;
pub mod magic_words;
pub mod marc_fields;
pub mod policy;
pub mod years;

pub use filenames::{derive_abbreviation, institution_key, unique_path};
pub use magic_words::{classify, classify_all, classify_marker, MagicWordCondition};
pub use policy::{FieldSource, IssueSource, PolicyResolver, ResolutionContext};
pub use years::{end_dates_compatible, resolve_earlier, resolve_later, start_dates_compatible};
