//! API server configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults  →  wareflow.toml (optional)  →  WAREFLOW_* environment
//! ```
//!
//! `WAREFLOW_PORT=9090` overrides `port = 8080` from the file, and so on for
//! every key.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use wareflow_db::DbConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "wareflow.toml";

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// SQLite database at `database_path`.
    ///
    /// Startup only connects and migrates. `seed_dir` is not read in this
    /// mode; the `seed` binary of wareflow-db imports it beforehand.
    Sqlite,
    /// In-memory maps loaded from `seed_dir`.
    Memory,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address
    pub bind_addr: String,

    /// Listen port
    pub port: u16,

    /// Store selection
    pub storage: StorageKind,

    /// SQLite database file (sqlite storage)
    pub database_path: PathBuf,

    /// JSON seed directory (memory storage)
    pub seed_dir: PathBuf,

    /// SQLite pool size
    pub max_connections: u32,

    /// Connections the pool keeps open
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Loads defaults, `wareflow.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Same as [`AppConfig::load`] with an explicit file path.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_addr", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("storage", "sqlite")?
            .set_default("database_path", "wareflow.db")?
            .set_default("seed_dir", "db")?
            .set_default("max_connections", 5_i64)?
            .set_default("min_connections", 1_i64)?
            .set_default("connect_timeout_secs", 30_i64)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix("WAREFLOW").try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::InvalidValue("min_connections".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("connect_timeout_secs".to_string()));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_addr".to_string()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Pool settings for sqlite storage.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.seed_dir, PathBuf::from("db"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wareflow.toml");
        fs::write(
            &path,
            "port = 9191\nstorage = \"memory\"\nseed_dir = \"fixtures\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.port, 9191);
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.seed_dir, PathBuf::from("fixtures"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wareflow.toml");

        fs::write(&path, "max_connections = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::InvalidValue(ref key)) if key == "max_connections"
        ));

        fs::write(&path, "max_connections = 2\nmin_connections = 3\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::InvalidValue(ref key)) if key == "min_connections"
        ));

        fs::write(&path, "bind_addr = \"not-an-ip\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::InvalidValue(ref key)) if key == "bind_addr"
        ));

        fs::write(&path, "storage = \"postgres\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_pool_settings_reach_db_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wareflow.toml");
        fs::write(
            &path,
            "database_path = \"stock.db\"\nmax_connections = 8\nmin_connections = 2\nconnect_timeout_secs = 10\n",
        )
        .unwrap();

        let db = AppConfig::load_from(&path).unwrap().db_config();
        assert_eq!(db.database_path, PathBuf::from("stock.db"));
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.min_connections, 2);
        assert_eq!(db.connect_timeout, Duration::from_secs(10));
    }
}
