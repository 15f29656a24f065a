//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default capture/report cadence in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 5000;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Presence server connection
    pub server: ServerSettings,

    /// Capture/report loop tuning
    pub sync: SyncSettings,

    /// Position source selection
    pub geolocation: GeolocationSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Presence server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// WebSocket endpoint of the presence server (e.g. "ws://host:3000/ws")
    pub url: String,

    /// Delay between reconnection attempts in milliseconds
    pub reconnect_delay_ms: u64,
}

/// Capture loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    /// Period between capture ticks in milliseconds (default: 5000)
    pub update_interval_ms: u64,

    /// Per-capture deadline in seconds (default: 5)
    pub capture_timeout_secs: u64,

    /// Ask the platform for the best fix it can produce
    pub high_accuracy: bool,
}

/// Position source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationSettings {
    /// Which source to use: "gpsd" or "fixed"
    pub source: String,

    /// gpsd socket address
    pub gpsd_addr: String,

    /// Latitude reported by the fixed source
    pub fixed_latitude: f64,

    /// Longitude reported by the fixed source
    pub fixed_longitude: f64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the update interval is zero.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.url", "ws://127.0.0.1:3000/ws")?
            .set_default("server.reconnect_delay_ms", 5000_i64)?
            .set_default("sync.update_interval_ms", DEFAULT_UPDATE_INTERVAL_MS as i64)?
            .set_default("sync.capture_timeout_secs", 5_i64)?
            .set_default("sync.high_accuracy", true)?
            .set_default("geolocation.source", "gpsd")?
            .set_default("geolocation.gpsd_addr", "127.0.0.1:2947")?
            .set_default("geolocation.fixed_latitude", 0.0)?
            .set_default("geolocation.fixed_longitude", 0.0)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SYNC__UPDATE_INTERVAL_MS=1000 -> sync.update_interval_ms = 1000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.url", std::env::var("SERVER_URL").ok())?
            .set_override_option("geolocation.gpsd_addr", std::env::var("GPSD_ADDR").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                if settings.sync.update_interval_ms == 0 {
                    return Err(ConfigError::Message(
                        "sync.update_interval_ms must be positive".into(),
                    ));
                }
                Ok(settings)
            })
    }
}
