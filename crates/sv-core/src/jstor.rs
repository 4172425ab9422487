//! JSTOR title lists.
//!
//! Institutions may decline to count titles already held in JSTOR. The lists
//! are plain text files of ISSNs, one per line, dropped into the data folder
//! with names starting `jstor`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use sv_common::Result;
use tracing::{debug, info};

/// Read every JSTOR ISSN list in `data_dir`.
///
/// Header lines (anything mentioning `issn`) and lines without a hyphen are
/// ignored. Spreadsheet copies of the lists (`.xlsx`) are skipped.
pub fn load_jstor_issns(data_dir: &Path) -> Result<BTreeSet<String>> {
    let mut issns = BTreeSet::new();
    if !data_dir.is_dir() {
        debug!(dir = %data_dir.display(), "no data folder; no JSTOR titles");
        return Ok(issns);
    }

    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.starts_with("jstor") || name.ends_with("xlsx") {
            continue;
        }
        let bytes = fs::read(entry.path())?;
        let content = String::from_utf8_lossy(&bytes);
        let before = issns.len();
        issns.extend(
            content
                .lines()
                .map(str::trim_end)
                .filter(|line| line.contains('-') && !line.to_lowercase().contains("issn"))
                .map(str::to_string),
        );
        debug!(file = %name, added = issns.len() - before, "read JSTOR list");
    }

    info!(count = issns.len(), "loaded JSTOR ISSNs");
    Ok(issns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_all_jstor_lists() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("jstor_arts.txt"), "ISSN\n0001-0002\n\n0003-0004  \n").unwrap();
        fs::write(dir.path().join("JSTOR_science.tsv"), "print_issn\n0005-0006\nbogus\n").unwrap();
        fs::write(dir.path().join("jstor_all.xlsx"), "9999-9999\n").unwrap();
        fs::write(dir.path().join("other.txt"), "1111-1111\n").unwrap();

        let issns = load_jstor_issns(dir.path()).unwrap();
        let got: Vec<&str> = issns.iter().map(String::as_str).collect();
        assert_eq!(got, vec!["0001-0002", "0003-0004", "0005-0006"]);
    }

    #[test]
    fn missing_folder_is_empty() {
        let dir = tempdir().expect("tempdir");
        let issns = load_jstor_issns(&dir.path().join("data")).unwrap();
        assert!(issns.is_empty());
    }
}
