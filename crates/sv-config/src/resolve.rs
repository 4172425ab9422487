//! Configuration file discovery.
//!
//! Search order, first hit wins:
//!
//! 1. Path given on the command line (used even if it does not exist, so a
//!    typo surfaces as an error instead of silently loading nothing).
//! 2. `SERIALS_VALIDATOR_CONFIG` environment variable.
//! 3. `./data/validator_config.json` beside the working directory.
//! 4. `<user config dir>/serials-validator/validator_config.json`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "SERIALS_VALIDATOR_CONFIG";

/// Configuration file name inside the data folder.
pub const CONFIG_FILE_NAME: &str = "validator_config.json";

const DATA_FOLDER: &str = "data";
const APP_DIR_NAME: &str = "serials-validator";

/// Resolve the configuration file path for this process.
pub fn resolve_config_path(cli: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_path_from(
        cli,
        std::env::var_os(CONFIG_ENV_VAR),
        &cwd,
        dirs::config_dir(),
    )
}

fn resolve_config_path_from(
    cli: Option<&Path>,
    env: Option<OsString>,
    cwd: &Path,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = cli {
        debug!(path = %path.display(), "config path from command line");
        return Some(path.to_path_buf());
    }
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        debug!(path = %path.display(), "config path from {CONFIG_ENV_VAR}");
        return Some(path);
    }

    let local = cwd.join(DATA_FOLDER).join(CONFIG_FILE_NAME);
    if local.is_file() {
        debug!(path = %local.display(), "config path from data folder");
        return Some(local);
    }

    let user = config_dir?.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
    if user.is_file() {
        debug!(path = %user.display(), "config path from user config dir");
        return Some(user);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn cli_wins_over_everything() {
        let dir = tempdir().expect("tempdir");
        let got = resolve_config_path_from(
            Some(Path::new("/explicit.json")),
            Some(OsString::from("/env.json")),
            dir.path(),
            None,
        );
        assert_eq!(got, Some(PathBuf::from("/explicit.json")));
    }

    #[test]
    fn env_wins_over_files() {
        let dir = tempdir().expect("tempdir");
        let got = resolve_config_path_from(None, Some(OsString::from("/env.json")), dir.path(), None);
        assert_eq!(got, Some(PathBuf::from("/env.json")));

        let empty_env = resolve_config_path_from(None, Some(OsString::new()), dir.path(), None);
        assert_eq!(empty_env, None);
    }

    #[test]
    fn data_folder_then_user_dir() {
        let cwd = tempdir().expect("tempdir");
        let user = tempdir().expect("tempdir");

        let user_file = user.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
        fs::create_dir_all(user_file.parent().unwrap()).unwrap();
        fs::write(&user_file, "{}").unwrap();
        let got = resolve_config_path_from(None, None, cwd.path(), Some(user.path().to_path_buf()));
        assert_eq!(got, Some(user_file));

        let local_file = cwd.path().join(DATA_FOLDER).join(CONFIG_FILE_NAME);
        fs::create_dir_all(local_file.parent().unwrap()).unwrap();
        fs::write(&local_file, "{}").unwrap();
        let got = resolve_config_path_from(None, None, cwd.path(), Some(user.path().to_path_buf()));
        assert_eq!(got, Some(local_file));
    }

    #[test]
    fn nothing_found() {
        let cwd = tempdir().expect("tempdir");
        assert_eq!(resolve_config_path_from(None, None, cwd.path(), None), None);
    }
}
