//! Configuration management for the banking assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (YWAIT_ prefix, `__` between sections)
//!
//! # Domain catalogue
//!
//! The quick-reply menus, service lists, branch table and mock queues live in
//! the [`domain`] module as static data.

pub mod constants;
pub mod domain;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, DialogueConfig, ObservabilityConfig, RuntimeEnvironment,
    ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::FileNotFound(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
