use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MemlogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IdentityConfig {
    /// Request header carrying the caller identity on the HTTP transport.
    pub header: String,
    /// Identity used for every call on the stdio transport. Unset means guest.
    pub stdio_user: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8765,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_memlog_dir()
            .join("memory.db")
            .to_string_lossy()
            .into_owned();
        Self {
            backend: "sqlite".into(),
            db_path,
        }
    }
}

impl StorageConfig {
    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.db_path)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header: "x-user-email".into(),
            stdio_user: None,
        }
    }
}

/// Returns `~/.memlog/`
pub fn default_memlog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memlog")
}

/// Returns the default config file path: `~/.memlog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memlog_dir().join("config.toml")
}

impl MemlogConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemlogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMLOG_TRANSPORT") {
            self.server.transport = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %val, "ignoring invalid MEMLOG_PORT"),
            }
        }
        if let Ok(val) = std::env::var("MEMLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_BACKEND") {
            self.storage.backend = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_IDENTITY_HEADER") {
            self.identity.header = val;
        }
        if let Ok(val) = std::env::var("MEMLOG_USER") {
            self.identity.stdio_user = Some(val);
        }
    }

    /// `host:port` for the HTTP transport.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
