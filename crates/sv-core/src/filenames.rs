//! Filename helpers: institution keys, display abbreviations, and
//! collision-free output paths.

use std::path::{Path, PathBuf};

use sv_common::{Error, Result};
use tracing::debug;

pub use sv_common::id::{institution_key, InstitutionKey};

/// Suffix given to spreadsheets generated from other input formats.
pub const AUTOGENERATED_SUFFIX: &str = "_AUTOGENERATED_FILE.tsv";

/// Literal prefix some institutions put on their data files.
const DATA_PREFIX: &str = "DATA.";

/// Give up numbering after this many collisions.
pub const MAX_NAME_ATTEMPTS: u32 = 999;

/// Short label for an input file, used in reports.
///
/// `ABC_AUTOGENERATED_FILE.tsv` gives `ABC`; otherwise `DATA.` is dropped and
/// the name is cut at the first period, space, or underscore, so
/// `DATA.Yale holdings.mrk` gives `Yale`.
pub fn derive_abbreviation(filename: &str) -> String {
    if let Some(stem) = filename.strip_suffix(AUTOGENERATED_SUFFIX) {
        return stem.to_string();
    }
    let normalized = filename.replace(DATA_PREFIX, "").replace(['.', ' '], "_");
    normalized
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A path that does not exist yet, derived from `path`.
///
/// Returns `path` itself when free. Otherwise tries `name(1).ext`,
/// `name(2).ext`, ... up to [`MAX_NAME_ATTEMPTS`], then fails with
/// [`Error::NameCollisionOverflow`].
pub fn unique_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (base, extension) = match file_name.rfind('.') {
        Some(i) => file_name.split_at(i),
        None => (file_name.as_str(), ""),
    };
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for n in 1..=MAX_NAME_ATTEMPTS {
        let candidate = parent.join(format!("{base}({n}){extension}"));
        if !candidate.exists() {
            debug!(
                original = %path.display(),
                chosen = %candidate.display(),
                "output name taken; numbered"
            );
            return Ok(candidate);
        }
    }
    Err(Error::NameCollisionOverflow {
        path: path.to_path_buf(),
        attempts: MAX_NAME_ATTEMPTS,
    })
}
