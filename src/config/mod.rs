//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus SERVER_URL / GPSD_ADDR)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoshare::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Reporting to {}", settings.server.url);
//! ```

mod settings;

pub use settings::*;
