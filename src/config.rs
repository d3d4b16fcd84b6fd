//! Runtime configuration read from the environment (and a `.env` file when present).

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "stat-tracker.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Postgres reachable at `database_url`
    Remote { database_url: String },
    /// SQLite file on local disk
    Local { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR {value}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. A non-empty
    /// `REMOTE_DATABASE_URL` selects Postgres, otherwise SQLite at
    /// `LOCAL_DATABASE_PATH`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let storage = match non_empty("REMOTE_DATABASE_URL") {
            Some(database_url) => StorageConfig::Remote { database_url },
            None => StorageConfig::Local {
                path: PathBuf::from(
                    non_empty("LOCAL_DATABASE_PATH")
                        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
                ),
            },
        };

        let raw_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { storage, bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_sqlite() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Local {
                path: PathBuf::from(DEFAULT_DATABASE_PATH)
            }
        );
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn remote_url_wins_over_local_path() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REMOTE_DATABASE_URL", "postgres://localhost/qb"),
            ("LOCAL_DATABASE_PATH", "/tmp/qb.db"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Remote {
                database_url: "postgres://localhost/qb".to_string()
            }
        );
    }

    #[test]
    fn blank_remote_url_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REMOTE_DATABASE_URL", "  "),
            ("LOCAL_DATABASE_PATH", "data/qb.db"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Local {
                path: PathBuf::from("data/qb.db")
            }
        );
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let result = AppConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")]));
        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    }
}
