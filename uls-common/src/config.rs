//! Configuration loading and data folder resolution
//!
//! The data folder (database plus download area) is resolved in priority
//! order: command-line argument, environment variable, config file value,
//! OS-dependent compiled default. The rest of the configuration comes from
//! an optional TOML file with compiled defaults for every key.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data folder
pub const DATA_DIR_ENV: &str = "ULS_DATA_DIR";

/// Environment variable overriding the config file location
pub const CONFIG_FILE_ENV: &str = "ULS_CONFIG";

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root data folder; the database and download area live under it
    pub data_dir: PathBuf,

    /// Database file name within the data folder
    pub database_file: String,

    /// Download area name within the data folder
    pub download_dir: String,

    /// Bulk export of authoritative license snapshots
    pub license_url: String,

    /// Bulk export of application snapshots
    pub application_url: String,

    /// Download attempts per dataset before giving up
    pub retry_attempts: u32,

    /// First retry waits this long; each subsequent retry doubles it
    pub retry_base_delay_secs: u64,

    /// Per-request network timeout
    pub request_timeout_secs: u64,

    /// Downloaded archives and working directories older than this are
    /// eligible for cleanup
    pub download_retention_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: "uls.db".to_string(),
            download_dir: "downloads".to_string(),
            license_url: "https://data.fcc.gov/download/pub/uls/complete/l_LMpriv.zip"
                .to_string(),
            application_url: "https://data.fcc.gov/download/pub/uls/complete/a_LMpriv.zip"
                .to_string(),
            retry_attempts: 3,
            retry_base_delay_secs: 60,
            request_timeout_secs: 300,
            download_retention_days: 7,
        }
    }
}

impl Config {
    /// Load configuration, applying the resolution priority order.
    ///
    /// `cli_config` and `cli_data_dir` come from command-line flags and win
    /// over everything else.
    pub fn load(cli_config: Option<&Path>, cli_data_dir: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_file(cli_config) {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                let parsed: Config = toml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                tracing::info!("Loaded configuration from {}", path.display());
                parsed
            }
            None => Config::default(),
        };

        // Data folder: CLI argument, then environment, then config/default
        if let Some(dir) = cli_data_dir {
            config.data_dir = dir.to_path_buf();
        } else if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        if config.retry_attempts == 0 {
            return Err(Error::Config("retry_attempts must be at least 1".to_string()));
        }

        Ok(config)
    }

    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Full path of the download area
    pub fn download_path(&self) -> PathBuf {
        self.data_dir.join(&self.download_dir)
    }

    /// Create the data folder and download area if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.download_path())?;
        Ok(())
    }
}

/// Locate the config file: CLI flag, then environment, then the platform
/// config directory. Returns None when no file exists (defaults apply).
fn resolve_config_file(cli_config: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir().map(|d| d.join("uls").join("config.toml"))?;
    if default.exists() {
        Some(default)
    } else {
        None
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("uls"))
        .unwrap_or_else(|| PathBuf::from("./uls_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_base_delay_secs, 60);
        assert!(config.license_url.ends_with(".zip"));
        assert_eq!(config.database_path().file_name().unwrap(), "uls.db");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let parsed: Config = toml::from_str("retry_attempts = 5\n").unwrap();
        assert_eq!(parsed.retry_attempts, 5);
        assert_eq!(parsed.database_file, "uls.db");
        assert_eq!(parsed.download_dir, "downloads");
    }

    #[test]
    fn cli_data_dir_wins() {
        let config = Config::load(None, Some(Path::new("/tmp/uls-test-data"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/uls-test-data"));
    }
}
