//! Application Startup
//!
//! Application building and session lifecycle management.

use std::sync::Arc;
use std::time::Duration;

use config::ConfigError;
use tokio::sync::broadcast;

use crate::application::{LocationSyncSession, SyncConfig};
use crate::config::{GeolocationSettings, Settings};
use crate::domain::{CaptureOptions, Position, PositionSource, PresenceTransport};
use crate::infrastructure::geolocation::{FixedSource, GpsdSource};
use crate::infrastructure::transport::WsPresenceTransport;
use crate::presentation::map::{self, MapView};
use crate::shared::error::AppError;

/// Application instance
pub struct Application {
    session: Arc<LocationSyncSession>,
    transport: Arc<WsPresenceTransport>,
}

impl Application {
    /// Build the application from settings
    pub fn build(settings: Settings) -> Result<Self, AppError> {
        // Spin up the transport; its driver keeps retrying until the
        // presence server is reachable.
        let transport = Arc::new(WsPresenceTransport::connect(
            settings.server.url.clone(),
            Duration::from_millis(settings.server.reconnect_delay_ms),
        ));

        let source = build_position_source(&settings.geolocation)?;
        tracing::info!(source = %settings.geolocation.source, "Position source ready");

        let sync_config = SyncConfig {
            update_interval: Duration::from_millis(settings.sync.update_interval_ms),
            capture: CaptureOptions {
                high_accuracy: settings.sync.high_accuracy,
                maximum_age: Duration::ZERO,
                timeout: Duration::from_secs(settings.sync.capture_timeout_secs),
            },
        };
        let session = Arc::new(LocationSyncSession::new(
            sync_config,
            source,
            transport.clone() as Arc<dyn PresenceTransport>,
        ));

        Ok(Self { session, transport })
    }

    /// Run the session until interrupted, logging the rendered view on
    /// every roster update.
    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        self.session.start();

        let mut roster_rx = self.transport.subscribe();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
                update = roster_rx.recv() => match update {
                    Ok(_) => self.log_view(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Roster receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        self.session.stop().await;
        Ok(())
    }

    fn log_view(&self) {
        match map::render(&self.session.snapshot()) {
            MapView::Loading => {
                tracing::info!("Waiting for the first location fix");
            }
            MapView::Ready(scene) => {
                tracing::info!(
                    connected = scene.connected_count,
                    markers = scene.markers.len(),
                    latitude = scene.center.latitude,
                    longitude = scene.center.longitude,
                    "Roster updated"
                );
            }
        }
    }
}

/// Select the position source configured in settings.
fn build_position_source(
    settings: &GeolocationSettings,
) -> Result<Arc<dyn PositionSource>, AppError> {
    match settings.source.as_str() {
        "gpsd" => Ok(Arc::new(GpsdSource::new(settings.gpsd_addr.clone()))),
        "fixed" => Ok(Arc::new(FixedSource::new(Position::new(
            settings.fixed_latitude,
            settings.fixed_longitude,
        )))),
        other => Err(AppError::Config(ConfigError::Message(format!(
            "unknown geolocation source '{}' (expected \"gpsd\" or \"fixed\")",
            other
        )))),
    }
}
