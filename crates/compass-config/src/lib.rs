//! # compass-config
//!
//! Layered configuration loading for the Compass client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COMPASS_*` prefix, `__` as separator)
//! 2. Project-level `.compass/config.toml`
//! 3. User-level `~/.config/compass/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COMPASS_PORTAL__BASE_URL` -> `portal.base_url`,
//! `COMPASS_CREDENTIALS__USERNAME` -> `credentials.username`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use compass_config::CompassConfig;
//!
//! let config = CompassConfig::load_with_dotenv().expect("config");
//! config.validate().expect("portal configured");
//! println!("portal: {}", config.portal.base_url);
//! ```

mod credentials;
mod defaults;
mod error;
mod portal;
mod resume;

pub use credentials::CredentialsConfig;
pub use defaults::DefaultsConfig;
pub use error::ConfigError;
pub use portal::PortalConfig;
pub use resume::ResumeConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompassConfig {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub session: ResumeConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl CompassConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".compass/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("COMPASS_").split("__"))
    }

    /// Check the fields the client cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.portal.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "portal".into(),
            });
        }
        if self.portal.login_endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "portal.login_endpoint".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.portal.session_cookie.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "portal.session_cookie".into(),
                reason: "must not be empty".into(),
            });
        }
        for (field, value) in [
            ("defaults.calendar_limit", self.defaults.calendar_limit),
            ("defaults.feed_count", self.defaults.feed_count),
            ("defaults.learning_task_limit", self.defaults.learning_task_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("compass").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
