//! Configuration for the `productload` binary.
//!
//! Values are layered in this order, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. An optional YAML file passed with `-c`
//! 3. Environment variables prefixed with `PL__`, using `__` to separate nested keys
//!
//! # Example
//!
//! ```yaml
//! repetitions: 3
//! server:
//!   port: 8080
//!   initial_product_count: 10
//! workload:
//!   workload_count: 1000
//!   max_concurrency: 32
//!   seed: 7
//! client:
//!   timeout: 5s
//! logging:
//!   level: debug
//! ```
//!
//! The same seed can be set through the environment as `PL__WORKLOAD__SEED=7`.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use productload_engine::WorkloadConfig;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "PL__";

/// The product service to run the workload against.
///
/// Used in: [`Config::server`]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host the embedded server binds to.
    ///
    /// # Environment Variable
    ///
    /// `PL__SERVER__HOST`
    pub host: String,

    /// Port the embedded server binds to. `0` picks a free port for every repetition.
    ///
    /// # Environment Variable
    ///
    /// `PL__SERVER__PORT`
    pub port: u16,

    /// Whether `run` starts an in-process server.
    ///
    /// When disabled, the workload targets `workload.host` and `workload.port` directly, and
    /// that service is expected to be running already.
    ///
    /// # Default
    ///
    /// `true`
    pub embedded: bool,

    /// Number of generated products the server starts with.
    pub initial_product_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 0,
            embedded: true,
            initial_product_count: 0,
        }
    }
}

/// HTTP client settings.
///
/// Used in: [`Config::client`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout for a single request, for example `500ms` or `5s`. Requests never time out if
    /// unset.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty for a terminal, otherwise simplified.
    #[default]
    Auto,
    /// Multi-line output with colors.
    Pretty,
    /// Compact single-line output without colors.
    Simplified,
}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging configuration. Logs are always written to stderr.
///
/// Used in: [`Config::logging`]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum log level: `trace`, `debug`, `info`, `warn`, `error` or `off`.
    ///
    /// `RUST_LOG` takes precedence and allows per-module directives.
    ///
    /// # Environment Variable
    ///
    /// `PL__LOGGING__LEVEL`
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,

    /// Log output format.
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Top-level configuration of the `productload` binary.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// The product server started by `run` and `serve`.
    pub server: ServerConfig,
    /// Parameters of every workload run.
    pub workload: WorkloadConfig,
    /// HTTP client settings.
    pub client: ClientConfig,
    /// Logging configuration.
    pub logging: Logging,
    /// How many times `run` repeats the benchmark, each time against a fresh server.
    pub repetitions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            workload: WorkloadConfig::default(),
            client: ClientConfig::default(),
            logging: Logging::default(),
            repetitions: 1,
        }
    }
}

impl Config {
    /// Loads the configuration from defaults, the optional YAML file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}
