//! # Node Configuration
//!
//! Plain structs with defaults, overridden from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LEDGER_LISTEN_ADDR` | `127.0.0.1:8080` |
//! | `LEDGER_STORAGE` | `file` (`memory` for a volatile ledger) |
//! | `LEDGER_DATA_DIR` | `./data` |
//! | `LEDGER_STORE_TIMEOUT_MS` | `5000` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const ENV_LISTEN_ADDR: &str = "LEDGER_LISTEN_ADDR";
pub const ENV_STORAGE: &str = "LEDGER_STORAGE";
pub const ENV_DATA_DIR: &str = "LEDGER_DATA_DIR";
pub const ENV_STORE_TIMEOUT_MS: &str = "LEDGER_STORE_TIMEOUT_MS";

/// Name of the store file inside the data directory.
pub const STORE_FILE_NAME: &str = "ledger.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("store timeout must be greater than zero")]
    ZeroTimeout,

    #[error("data directory must not be empty for the file backend")]
    EmptyDataDir,
}

/// Which `BlockStore` the node runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Volatile arena store; the chain is lost on exit.
    Memory,
    /// KV store persisted under the data directory.
    #[default]
    File,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            other => Err(format!("expected 'memory' or 'file', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub listen_addr: SocketAddr,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl StorageConfig {
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Upper bound for a single ledger call made by a request handler.
    pub store_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

impl NodeConfig {
    /// Defaults overridden by `LEDGER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`NodeConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = NodeConfig::default();

        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.network.listen_addr = parse_var(ENV_LISTEN_ADDR, &addr)?;
        }
        if let Some(backend) = lookup(ENV_STORAGE) {
            config.storage.backend = parse_var(ENV_STORAGE, &backend)?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup(ENV_STORE_TIMEOUT_MS) {
            let ms: u64 = parse_var(ENV_STORE_TIMEOUT_MS, &ms)?;
            config.api.store_timeout = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.store_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(())
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
