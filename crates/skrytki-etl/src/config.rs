use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys accepted in the config file, in display order.
pub const KEYS: &[&str] = &[
    "database_path",
    "csv_path",
    "bind_address",
    "pool_size",
    "request_timeout_ms",
    "default_limit",
];

/// Configuration for skrytki.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SKRYTKI_* prefix)
/// 3. Config file (~/.config/skrytki/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database holding the search tables.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: SKRYTKI_DATABASE_PATH
    /// - Default: ~/.local/share/skrytki/skrytki.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Registry extract read by `skrytki load` when no path is given.
    ///
    /// ENV: SKRYTKI_CSV_PATH
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum number of open database connections while serving.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Per-request deadline in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Result limit used when a request does not give one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            csv_path: None,
            bind_address: default_bind_address(),
            pool_size: default_pool_size(),
            request_timeout_ms: default_request_timeout_ms(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file and environment
    /// variables. A missing config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `config_path` (if it exists) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("skrytki");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }

    /// Load configuration, overriding the database path (the `--db` flag).
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Directory holding the intermediate files of an ETL run.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.data_dir().join("staging")
    }

    /// Workflow state store of the ETL pipeline.
    #[must_use]
    pub fn state_store_path(&self) -> PathBuf {
        self.data_dir().join("pipeline.db")
    }

    /// Render one setting for display, `None` for an unknown key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "database_path" => self.database_path.display().to_string(),
            "csv_path" => self
                .csv_path
                .as_ref()
                .map_or_else(|| "<not set>".to_string(), |p| p.display().to_string()),
            "bind_address" => self.bind_address.clone(),
            "pool_size" => self.pool_size.to_string(),
            "request_timeout_ms" => self.request_timeout_ms.to_string(),
            "default_limit" => self.default_limit.to_string(),
            _ => return None,
        };
        Some(value)
    }

    fn data_dir(&self) -> PathBuf {
        self.database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/skrytki/skrytki.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skrytki")
        .join("skrytki.db")
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

const fn default_pool_size() -> usize {
    4
}

const fn default_request_timeout_ms() -> u64 {
    5000
}

const fn default_limit() -> usize {
    100
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/skrytki/config.toml
/// - macOS: ~/Library/Application Support/skrytki/config.toml
/// - Windows: %APPDATA%\skrytki\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skrytki")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# skrytki configuration file
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SKRYTKI_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database holding the search tables
#
# Can also be set via:
# - CLI: skrytki --db /custom/path.db serve
# - Environment: SKRYTKI_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/skrytki.db"

# Registry extract used by 'skrytki load' when no file is given
# Environment: SKRYTKI_CSV_PATH
#csv_path = "/path/to/skrytki.csv"

# HTTP server
#bind_address = "127.0.0.1:5000"

# Database connections kept open by the server
#pool_size = 4

# Per-request deadline in milliseconds
#request_timeout_ms = 5000

# Result limit when a search request gives none
#default_limit = 100
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert!(config.csv_path.is_none());
        assert_eq!(config.bind_address, "127.0.0.1:5000");
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.default_limit, 100);
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/skrytki-test.db");
        let config = Config::load_with_db_path(custom_path.clone()).unwrap();
        assert_eq!(config.database_path, custom_path);
        assert_eq!(config.staging_dir(), PathBuf::from("/tmp/staging"));
        assert_eq!(config.state_store_path(), PathBuf::from("/tmp/pipeline.db"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pool_size = 8\nbind_address = \"0.0.0.0:8080\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.default_limit, 100);
    }

    #[test]
    fn test_example_config_is_all_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, example_config()).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pool_size, default_pool_size());
        assert_eq!(config.bind_address, default_bind_address());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        for key in KEYS {
            assert!(config.get(key).is_some(), "{key} should be readable");
        }
        assert_eq!(config.get("csv_path").as_deref(), Some("<not set>"));
        assert!(config.get("no_such_key").is_none());
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let config = Config {
            database_path: PathBuf::from("skrytki.db"),
            ..Config::default()
        };
        assert_eq!(config.staging_dir(), PathBuf::from("./staging"));
    }
}
