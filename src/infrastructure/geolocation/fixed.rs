//! Constant position source.

use async_trait::async_trait;

use crate::domain::{CaptureOptions, GeolocationError, Position, PositionSource};

/// Position source that always reports a configured location.
///
/// For hosts without positioning hardware.
pub struct FixedSource {
    position: Position,
}

impl FixedSource {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionSource for FixedSource {
    async fn current_position(
        &self,
        _options: &CaptureOptions,
    ) -> Result<Position, GeolocationError> {
        Ok(self.position)
    }
}
