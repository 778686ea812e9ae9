//! Configuration management for the SDP negotiation engine

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Codec and session preferences used by the negotiator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Acceptable audio codec names in preference order; "*" stands for
    /// every codec not listed
    pub audio_codecs: Vec<String>,
    /// Payload types placed in locally built offers
    pub offer_codecs: Vec<u8>,
    /// s= line of locally built sessions
    pub session_name: String,
    /// Packet time of locally built sessions (ms)
    pub ptime_ms: u32,
    /// RFC 4733 event range for telephone-event formats
    pub dtmf_events: String,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            audio_codecs: ["PCMA", "PCMU", "G722", "G729", "opus"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            offer_codecs: vec![8, 0, 9, 18, 96, 101],
            session_name: "-".to_string(),
            ptime_ms: 20,
            dtmf_events: "0-16".to_string(),
        }
    }
}

impl NegotiationConfig {
    /// Check the values a negotiator cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.audio_codecs.is_empty() {
            return Err(ConfigError::Invalid("audio_codecs must not be empty".to_string()));
        }
        if self.audio_codecs.iter().filter(|c| c.as_str() == "*").count() > 1 {
            return Err(ConfigError::Invalid(
                "audio_codecs may contain at most one \"*\"".to_string(),
            ));
        }
        if self.ptime_ms == 0 {
            return Err(ConfigError::Invalid("ptime_ms must be positive".to_string()));
        }
        if self.dtmf_events.trim().is_empty() {
            return Err(ConfigError::Invalid("dtmf_events must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub negotiation: NegotiationConfig,
    pub log_level: Option<String>,
}

impl EngineConfig {
    /// Load configuration from defaults, an optional file (TOML, YAML or
    /// JSON by extension) and `SDP_*` environment variables
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, environment())
    }

    /// Load configuration from environment variables, reading `.env` first
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::load(None)
    }

    fn load_with(path: Option<&Path>, env: Environment) -> ConfigResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: EngineConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.negotiation.validate()?;
        Ok(config)
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

// SDP_NEGOTIATION__SESSION_NAME -> negotiation.session_name
fn environment() -> Environment {
    Environment::with_prefix("SDP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("negotiation.audio_codecs")
        .with_list_parse_key("negotiation.offer_codecs")
}
