use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{JournalError, Result},
    stats::DEFAULT_STREAK_WALK_LIMIT,
    store::{validate_key, DEFAULT_STORAGE_KEY},
};

pub const CONFIG_FILE: &str = "config.json";
pub const DATA_DIR_ENV: &str = "XINQING_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "journal-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub streak_walk_limit: u32,
}

/// On-disk shape of `config.json`; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    storage_key: Option<String>,
    streak_walk_limit: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            streak_walk_limit: DEFAULT_STREAK_WALK_LIMIT,
        }
    }
}

impl Config {
    /// Layers, lowest first: defaults, `config.json`, `XINQING_DATA_DIR`, the
    /// `--data-dir` flag.
    pub fn load(data_dir_flag: Option<&Path>) -> Result<Self> {
        let explicit = data_dir_flag
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from));
        Self::resolve(explicit, PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// `config.json` is read from the explicit directory if one was given,
    /// else from `fallback_dir`. Only in the latter case may the file move
    /// the data directory; a relative `data_dir` is taken from the file's
    /// own directory.
    pub fn resolve(explicit_dir: Option<PathBuf>, fallback_dir: PathBuf) -> Result<Self> {
        let config_dir = explicit_dir.clone().unwrap_or(fallback_dir);
        let file = Self::read_file(&config_dir)?;

        let defaults = Config::default();
        let data_dir = match (explicit_dir, file.data_dir) {
            (Some(dir), _) => dir,
            (None, Some(dir)) => config_dir.join(dir),
            (None, None) => config_dir,
        };
        let config = Config {
            data_dir,
            storage_key: file.storage_key.unwrap_or(defaults.storage_key),
            streak_walk_limit: file.streak_walk_limit.unwrap_or(defaults.streak_walk_limit),
        };
        validate_key(&config.storage_key)?;
        Ok(config)
    }

    fn read_file(dir: &Path) -> Result<ConfigFile> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let data = fs::read_to_string(&path).map_err(|e| JournalError::Config {
            path: path.clone(),
            source: Box::new(e),
        })?;
        serde_json::from_str(&data).map_err(|e| JournalError::Config {
            path,
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(Some(dir.path())).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.streak_walk_limit, DEFAULT_STREAK_WALK_LIMIT);
    }

    #[test]
    fn partial_config_falls_back_per_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), r#"{"streak_walk_limit": 365}"#).unwrap();
        let config = Config::load(Some(dir.path())).unwrap();
        assert_eq!(config.streak_walk_limit, 365);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn explicit_dir_wins_over_data_dir_in_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), r#"{"data_dir": "/elsewhere"}"#).unwrap();
        let config = Config::load(Some(dir.path())).unwrap();
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn data_dir_in_file_applies_without_flag_or_env() {
        let home = tempfile::tempdir().expect("tempdir");
        let target = tempfile::tempdir().expect("tempdir");
        fs::write(
            home.path().join(CONFIG_FILE),
            serde_json::json!({ "data_dir": target.path() }).to_string(),
        )
        .unwrap();

        let config = Config::resolve(None, home.path().to_path_buf()).unwrap();
        assert_eq!(config.data_dir, target.path());

        fs::write(home.path().join(CONFIG_FILE), r#"{"data_dir": "nested"}"#).unwrap();
        let config = Config::resolve(None, home.path().to_path_buf()).unwrap();
        assert_eq!(config.data_dir, home.path().join("nested"));
    }

    #[test]
    fn fallback_dir_is_used_when_file_is_silent() {
        let home = tempfile::tempdir().expect("tempdir");
        let config = Config::resolve(None, home.path().to_path_buf()).unwrap();
        assert_eq!(config.data_dir, home.path());
    }

    #[test]
    fn storage_key_with_path_separators_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), r#"{"storage_key": "../x"}"#).unwrap();
        let err = Config::load(Some(dir.path())).unwrap_err();
        assert!(matches!(err, JournalError::InvalidKey(k) if k == "../x"));
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "{ nope").unwrap();
        let err = Config::load(Some(dir.path())).unwrap_err();
        assert!(matches!(err, JournalError::Config { .. }));
    }
}
