//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use ywait_config::{load_settings, Settings};

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Settings) -> Self {
        Self::with_env(config, None)
    }

    /// Create new application state with environment name for reload support
    pub fn with_env(config: Settings, env: Option<String>) -> Self {
        let sessions = Arc::new(SessionManager::with_config(&config.dialogue));
        Self {
            config: Arc::new(RwLock::new(config)),
            sessions,
            env,
        }
    }

    /// Reload configuration from files.
    ///
    /// Session limits, CORS, logging and the RNG seed are fixed at startup;
    /// the greeting brand applies to sessions created afterwards.
    pub fn reload_config(&self) -> Result<(), ServerError> {
        let new_config = load_settings(self.env.as_deref())?;

        let mut config = self.config.write();
        *config = new_config;

        tracing::info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }

    /// Brand named in new sessions' greeting
    pub fn assistant_brand(&self) -> String {
        self.config.read().dialogue.assistant_brand.clone()
    }
}
