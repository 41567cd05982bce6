//! Configuration management for the census income service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "CENSUS_CONFIG";

/// Prefix for environment overrides, e.g. `CENSUS__SERVER__PORT=9000`
const ENV_PREFIX: &str = "CENSUS";

/// Serialized model artifact format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// ONNX graph executed with ONNX Runtime
    Onnx,
    /// JSON description of a linear decision function
    Linear,
}

impl ModelFormat {
    /// Guess the format from a file extension (`.json` is linear, anything else ONNX)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ModelFormat::Linear,
            _ => ModelFormat::Onnx,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the serialized model artifact
    pub path: PathBuf,
    /// Artifact format; inferred from the file extension when unset
    pub format: Option<ModelFormat>,
    /// Number of intra-op threads for ONNX inference
    pub onnx_threads: usize,
}

impl ModelConfig {
    /// Format to load the artifact with
    pub fn resolved_format(&self) -> ModelFormat {
        self.format
            .unwrap_or_else(|| ModelFormat::from_path(&self.path))
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/classifier.onnx"),
            format: None,
            onnx_threads: 1,
        }
    }
}

/// Static web content configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served under `/`
    pub dir: PathBuf,
    /// Document returned for `GET /`
    pub index: String,
}

impl StaticFilesConfig {
    /// Full path of the index document
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index)
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("web"),
            index: "index.html".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, or the one named by `CENSUS_CONFIG`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path, layered with environment overrides.
    ///
    /// A missing file is not an error; defaults fill every unset field.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}
