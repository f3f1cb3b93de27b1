//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with GUILDHALL_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like the database URL and session key should be kept in
//! environment variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Guildhall".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Cookie signing key (should be in env var GUILDHALL_SERVER__SECRET_KEY).
    /// Must be at least 64 bytes; shorter keys are replaced at startup.
    #[serde(default)]
    pub secret_key: String,
    /// Set the Secure attribute on session cookies
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            secret_key: String::new(),
            secure_cookies: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (should be in env var GUILDHALL_DATABASE__URL or DATABASE_URL)
    pub url: String,
}

/// Baseline feature flag values. The `feature_flags` table and, when allowed,
/// URL overrides are layered on top of these per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Election routes as a whole
    pub elections: bool,
    /// Accepting nominations
    pub nominations: bool,
    /// Results visible while voting is still open
    pub live_results: bool,
    /// Honour `?ff=key:on,key:off` on requests. Staging only.
    pub allow_url_overrides: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            elections: true,
            nominations: true,
            live_results: true,
            allow_url_overrides: false,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub features: FeaturesConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g. GUILDHALL_FEATURES__LIVE_RESULTS, GUILDHALL_SERVER__BIND_ADDRESS
            .add_source(
                Environment::with_prefix("GUILDHALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Database URL from config, falling back to the conventional DATABASE_URL.
    pub fn database_url(&self) -> Option<String> {
        if !self.database.url.is_empty() {
            return Some(self.database.url.clone());
        }
        std::env::var("DATABASE_URL").ok()
    }
}

/// Initialize application configuration
///
/// Triggers the lazy load and logs the result. Call early in startup.
pub fn init() {
    let config = get_config();
    log::info!(
        "Configuration loaded: site.name = {}, bind = {}",
        config.site.name,
        config.server.bind_address
    );
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get baseline feature configuration
pub fn features() -> FeaturesConfig {
    get_config().features
}
