//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PODIUM_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::reasoning::DEFAULT_RETRY_BUDGET;

/// Default high-capacity generative model identifier.
pub const DEFAULT_GEN_MODEL: &str = "gpt-4o";

/// Default lightweight generative model identifier.
pub const DEFAULT_GEN_MODEL_LITE: &str = "gpt-4o-mini";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PODIUM_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the embedding model directory (BERT safetensors + tokenizer).
    /// Unset runs the embedder in deterministic stub mode.
    pub embed_model_path: Option<PathBuf>,

    /// High-capacity generative model identifier. Default: `gpt-4o`.
    pub gen_model: String,

    /// Lightweight generative model identifier, also used for condensation.
    /// Default: `gpt-4o-mini`.
    pub gen_model_lite: String,

    /// Declared accelerator memory in GiB, used by tier selection.
    /// Default: `0.0`.
    pub accel_memory_gb: f64,

    /// Total generate attempts per evaluation, first included. Default: `3`.
    pub retry_budget: u32,

    /// Slides condensed concurrently per batch. Default: `4`.
    pub condense_batch_size: usize,

    /// Timeout for one structured-evaluation call, seconds. Default: `120`.
    pub generate_timeout_secs: u64,

    /// Timeout for one slide condensation call, seconds. Default: `30`.
    pub condense_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            embed_model_path: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            gen_model_lite: DEFAULT_GEN_MODEL_LITE.to_string(),
            accel_memory_gb: 0.0,
            retry_budget: DEFAULT_RETRY_BUDGET,
            condense_batch_size: 4,
            generate_timeout_secs: 120,
            condense_timeout_secs: 30,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PODIUM_PORT";
    const ENV_BIND_ADDR: &'static str = "PODIUM_BIND_ADDR";
    const ENV_EMBED_MODEL_PATH: &'static str = "PODIUM_EMBED_MODEL_PATH";
    const ENV_GEN_MODEL: &'static str = "PODIUM_GEN_MODEL";
    const ENV_GEN_MODEL_LITE: &'static str = "PODIUM_GEN_MODEL_LITE";
    const ENV_ACCEL_MEMORY_GB: &'static str = "PODIUM_ACCEL_MEMORY_GB";
    const ENV_RETRY_BUDGET: &'static str = "PODIUM_RETRY_BUDGET";
    const ENV_CONDENSE_BATCH_SIZE: &'static str = "PODIUM_CONDENSE_BATCH_SIZE";
    const ENV_GENERATE_TIMEOUT_SECS: &'static str = "PODIUM_GENERATE_TIMEOUT_SECS";
    const ENV_CONDENSE_TIMEOUT_SECS: &'static str = "PODIUM_CONDENSE_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let embed_model_path = Self::parse_optional_path_from_env(Self::ENV_EMBED_MODEL_PATH);
        let gen_model = Self::parse_string_from_env(Self::ENV_GEN_MODEL, defaults.gen_model);
        let gen_model_lite =
            Self::parse_string_from_env(Self::ENV_GEN_MODEL_LITE, defaults.gen_model_lite);
        let accel_memory_gb =
            Self::parse_from_env(Self::ENV_ACCEL_MEMORY_GB, defaults.accel_memory_gb);
        let retry_budget = Self::parse_from_env(Self::ENV_RETRY_BUDGET, defaults.retry_budget);
        let condense_batch_size =
            Self::parse_from_env(Self::ENV_CONDENSE_BATCH_SIZE, defaults.condense_batch_size);
        let generate_timeout_secs = Self::parse_from_env(
            Self::ENV_GENERATE_TIMEOUT_SECS,
            defaults.generate_timeout_secs,
        );
        let condense_timeout_secs = Self::parse_from_env(
            Self::ENV_CONDENSE_TIMEOUT_SECS,
            defaults.condense_timeout_secs,
        );

        Ok(Self {
            port,
            bind_addr,
            embed_model_path,
            gen_model,
            gen_model_lite,
            accel_memory_gb,
            retry_budget,
            condense_batch_size,
            generate_timeout_secs,
            condense_timeout_secs,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.embed_model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.gen_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_GEN_MODEL,
                value: self.gen_model.clone(),
                constraint: "must not be empty",
            });
        }

        if self.gen_model_lite.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_GEN_MODEL_LITE,
                value: self.gen_model_lite.clone(),
                constraint: "must not be empty",
            });
        }

        if !self.accel_memory_gb.is_finite() || self.accel_memory_gb < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_ACCEL_MEMORY_GB,
                value: self.accel_memory_gb.to_string(),
                constraint: "must be a finite non-negative number",
            });
        }

        if self.retry_budget == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RETRY_BUDGET,
                value: self.retry_budget.to_string(),
                constraint: "must be at least 1",
            });
        }

        if self.condense_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CONDENSE_BATCH_SIZE,
                value: self.condense_batch_size.to_string(),
                constraint: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
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
        env::var(var_name).unwrap_or(default)
    }

    /// Parses directly into the target type, so values that overflow it
    /// fall back to the default instead of being truncated by a cast.
    fn parse_from_env<T: FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
