//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CODESIM_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_BATCH, DEFAULT_MODEL_NAME};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CODESIM_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: Option<PathBuf>,

    /// Model name reported by `/healthz`. Default: `microsoft/codebert-base`.
    pub model_name: String,

    /// Max snippets accepted by `/batch-similarity`. Default: `256`.
    pub max_batch: usize,

    /// Run the deterministic stub encoder instead of loading a model.
    pub stub_encoder: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_batch: DEFAULT_MAX_BATCH,
            stub_encoder: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CODESIM_PORT";
    const ENV_BIND_ADDR: &'static str = "CODESIM_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "CODESIM_MODEL_PATH";
    const ENV_MODEL_NAME: &'static str = "CODESIM_MODEL_NAME";
    const ENV_MAX_BATCH: &'static str = "CODESIM_MAX_BATCH";
    const ENV_STUB_ENCODER: &'static str = "CODESIM_STUB_ENCODER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let model_name = Self::parse_string_from_env(Self::ENV_MODEL_NAME, defaults.model_name);
        let max_batch = Self::parse_usize_from_env(Self::ENV_MAX_BATCH, defaults.max_batch)?;
        let stub_encoder = env::var_os(Self::ENV_STUB_ENCODER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            port,
            bind_addr,
            model_path,
            model_name,
            max_batch,
            stub_encoder,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.max_batch == 0 {
            return Err(ConfigError::InvalidMaxBatch {
                value: self.max_batch.to_string(),
            });
        }

        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxBatch { value }),
            Err(_) => Ok(default),
        }
    }
}
