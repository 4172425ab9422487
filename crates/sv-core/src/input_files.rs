//! Discovery of input files in the input folder.

use std::fs;
use std::path::Path;

use serde::Serialize;
use sv_common::{Error, Result};
use tracing::{debug, warn};

/// Extensions the validator accepts as input.
pub const VIABLE_EXTENSIONS: &[&str] = &["mrk", "txt", "tsv", "csv", "xlsx"];

/// Broad kind of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// MARC in mnemonic (`.mrk`) form.
    Marc,
    /// Tabular extract: txt, tsv, csv, or xlsx.
    Spreadsheet,
}

impl InputFormat {
    /// Classify a file by extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        if !VIABLE_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }
        Some(if extension == "mrk" {
            InputFormat::Marc
        } else {
            InputFormat::Spreadsheet
        })
    }
}

/// Names of the viable input files in `dir`, sorted.
///
/// Office lock files (names starting with `~`) are skipped.
pub fn list_input_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::InputFolderMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('~') || InputFormat::from_filename(&name).is_none() {
            debug!(file = %name, "skipping non-input file");
            continue;
        }
        files.push(name);
    }
    files.sort();

    if files.is_empty() {
        warn!(dir = %dir.display(), "no input files found");
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(InputFormat::from_filename("yale.MRK"), Some(InputFormat::Marc));
        assert_eq!(
            InputFormat::from_filename("yale.2021.xlsx"),
            Some(InputFormat::Spreadsheet)
        );
        assert_eq!(InputFormat::from_filename("notes.docx"), None);
        assert_eq!(InputFormat::from_filename("README"), None);
    }

    #[test]
    fn lists_viable_files_sorted() {
        let dir = tempdir().expect("tempdir");
        for name in ["b.tsv", "a.mrk", "~$lock.xlsx", "notes.docx", "C.CSV"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.tsv")).unwrap();

        let files = list_input_files(dir.path()).unwrap();
        assert_eq!(files, vec!["C.CSV", "a.mrk", "b.tsv"]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let err = list_input_files(&dir.path().join("input")).unwrap_err();
        assert!(matches!(err, Error::InputFolderMissing { .. }));
    }
}
