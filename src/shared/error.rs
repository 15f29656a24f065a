//! Application Error Types
//!
//! Top-level error aggregation for startup and the binary boundary.
//! Subsystem errors stay close to their seams (`GeolocationError`,
//! `TransportError`); this type collects whatever crosses into `main`.

use crate::domain::{GeolocationError, TransportError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
