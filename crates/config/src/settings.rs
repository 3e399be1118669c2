//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{self, sessions};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialogue engine and session store configuration
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    constants::server::DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    constants::server::DEFAULT_PORT
}
fn default_timeout() -> u64 {
    constants::server::DEFAULT_TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Dialogue engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Maximum concurrent sessions held in memory
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time after which a session is discarded
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,

    /// Interval of the expired-session sweep
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Seed for mock values (wait estimates, queue numbers, codes).
    /// `None` draws from entropy; a fixed seed makes replies reproducible.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Brand named in the opening greeting
    #[serde(default = "default_brand")]
    pub assistant_brand: String,
}

fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}
fn default_session_timeout() -> u64 {
    sessions::SESSION_TIMEOUT_SECS
}
fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}
fn default_brand() -> String {
    constants::DEFAULT_BRAND.to_string()
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            session_timeout_seconds: default_session_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            rng_seed: None,
            assistant_brand: default_brand(),
        }
    }
}

impl DialogueConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_dialogue()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.environment.is_strict() && !self.server.cors_enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: format!("CORS cannot be disabled in {:?}", self.environment),
            });
        }

        Ok(())
    }

    fn validate_dialogue(&self) -> Result<(), ConfigError> {
        let dialogue = &self.dialogue;

        if dialogue.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.max_sessions".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if dialogue.session_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.session_timeout_seconds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if dialogue.cleanup_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.cleanup_interval_seconds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if dialogue.cleanup_interval_seconds > dialogue.session_timeout_seconds {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.cleanup_interval_seconds".to_string(),
                message: format!(
                    "Cleanup interval ({}s) exceeds session timeout ({}s)",
                    dialogue.cleanup_interval_seconds, dialogue.session_timeout_seconds
                ),
            });
        }

        if dialogue.assistant_brand.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.assistant_brand".to_string(),
                message: "Brand must not be empty".to_string(),
            });
        }

        if dialogue.rng_seed.is_some() && self.environment.is_production() {
            tracing::warn!("dialogue.rng_seed is set in production; mock values will repeat");
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!("Unknown level '{}'", self.observability.log_level),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/` and the environment.
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder =
            builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    // YWAIT_SERVER__PORT=9000 -> server.port
    builder = builder.add_source(
        Environment::with_prefix("YWAIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.dialogue.max_sessions, 1000);
        assert_eq!(settings.dialogue.assistant_brand, "Y-Wait Banking");
        assert!(settings.dialogue.rng_seed.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_dialogue_validation() {
        let mut settings = Settings::default();
        settings.dialogue.max_sessions = 0;
        assert!(settings.validate().is_err());

        settings.dialogue.max_sessions = 10;
        settings.dialogue.cleanup_interval_seconds = 7200;
        assert!(settings.validate().is_err());

        settings.dialogue.cleanup_interval_seconds = 60;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate_server().is_err());

        settings.server.port = 8080;
        settings.server.cors_enabled = false;
        assert!(settings.validate_server().is_ok());

        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate_server().is_err());
    }

    #[test]
    fn test_log_level_validation() {
        let mut settings = Settings::default();
        settings.observability.log_level = "DEBUG".to_string();
        assert!(settings.validate().is_ok());

        settings.observability.log_level = "chatty".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\ndialogue:\n  max_sessions: 5\n  rng_seed: 42"
        )
        .unwrap();

        let mut staging = std::fs::File::create(dir.path().join("staging.yaml")).unwrap();
        writeln!(staging, "environment: staging\ndialogue:\n  max_sessions: 7").unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.dialogue.max_sessions, 5);
        assert_eq!(settings.dialogue.rng_seed, Some(42));

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.dialogue.max_sessions, 7);
        assert_eq!(settings.dialogue.rng_seed, Some(42));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(file, "dialogue:\n  max_sessions: 0").unwrap();

        assert!(load_settings_from(dir.path(), None).is_err());
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), None).unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
