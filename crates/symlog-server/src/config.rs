use std::path::PathBuf;

use thiserror::Error;

use symlog_gateway::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GatewayConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub template_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or_default = |name: &str, default: &str| value(name).unwrap_or_else(|| default.to_string());

        let api_key = value("GROQ_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;

        let port = match value("SYMLOG_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                name: "SYMLOG_PORT".to_string(),
                message: format!("{e}"),
            })?,
            None => 5000,
        };

        Ok(Self {
            gateway: GatewayConfig {
                endpoint: or_default("GROQ_API_URL", DEFAULT_ENDPOINT),
                api_key,
                model: or_default("LLAMA_MODEL", DEFAULT_MODEL),
            },
            db_path: PathBuf::from(or_default("SYMLOG_DB_PATH", "symptoms.db")),
            host: or_default("SYMLOG_HOST", "0.0.0.0"),
            port,
            static_dir: PathBuf::from(or_default("SYMLOG_STATIC_DIR", "static")),
            template_dir: PathBuf::from(or_default("SYMLOG_TEMPLATE_DIR", "templates")),
        })
    }
}
