//! Server configuration from the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use ledgercast_observability::LogFormat;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_FILE: &str = "accounts.json";
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub data_file: PathBuf,
    /// Pending events a subscriber may fall behind by before it is dropped.
    pub subscriber_buffer: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("LEDGERCAST_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "LEDGERCAST_LISTEN_ADDR",
                reason: e.to_string(),
            })?;

        let data_file = lookup("LEDGERCAST_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let subscriber_buffer = match lookup("LEDGERCAST_SUBSCRIBER_BUFFER") {
            None => DEFAULT_SUBSCRIBER_BUFFER,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "LEDGERCAST_SUBSCRIBER_BUFFER",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "LEDGERCAST_SUBSCRIBER_BUFFER",
                        reason: e.to_string(),
                    });
                }
            },
        };

        let log_format = match lookup("LEDGERCAST_LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "LEDGERCAST_LOG_FORMAT",
                reason: format!("unknown format '{raw}' (expected json or pretty)"),
            })?,
        };

        Ok(Self {
            listen_addr,
            data_file,
            subscriber_buffer,
            log_format,
        })
    }
}
