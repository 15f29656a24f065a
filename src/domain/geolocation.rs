//! The platform location service seam.

use std::time::Duration;

use async_trait::async_trait;

use super::position::Position;

/// Default per-capture deadline.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for a single capture attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Require the best fix the platform can produce.
    pub high_accuracy: bool,

    /// Oldest acceptable cached fix. Zero means a fresh fix every time.
    pub maximum_age: Duration,

    /// Per-attempt deadline.
    pub timeout: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }
}

/// Geolocation failures.
///
/// All are terminal for the attempt that produced them; the next capture
/// tick retries from scratch.
#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("no location service reachable at {0}")]
    Unavailable(String),

    #[error("location capture timed out after {0:?}")]
    Timeout(Duration),

    #[error("location service produced no usable fix")]
    NoFix,

    #[error("location service I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of device positions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Capture the current device position.
    async fn current_position(&self, options: &CaptureOptions) -> Result<Position, GeolocationError>;
}
