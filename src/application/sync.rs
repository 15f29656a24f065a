//! Location Sync Session
//!
//! One participant's live session against the presence server: a driver
//! task hosts the capture timer and the inbound roster handler, and all
//! mutable session state (identity, position, roster) lives on the session
//! object so the hosting application controls the lifecycle explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::config::DEFAULT_UPDATE_INTERVAL_MS;
use crate::domain::{
    CaptureOptions, LocalIdentity, LocationUpdate, Position, PositionSource, PresenceTransport,
    Roster,
};

/// Session tuning parameters.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Capture cadence. The first tick fires immediately at `start()`.
    pub update_interval: Duration,

    /// Options passed to the position source on every capture.
    pub capture: CaptureOptions,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS),
            capture: CaptureOptions::default(),
        }
    }
}

/// Point-in-time copy of the session state, for rendering.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub identity: Option<LocalIdentity>,
    pub position: Option<Position>,
    pub roster: Roster,
}

/// One participant's live session against the presence server.
pub struct LocationSyncSession {
    inner: Arc<SessionInner>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

struct SessionInner {
    config: SyncConfig,
    source: Arc<dyn PositionSource>,
    transport: Arc<dyn PresenceTransport>,
    identity: RwLock<Option<LocalIdentity>>,
    position: RwLock<Option<Position>>,
    roster: RwLock<Roster>,
    running: AtomicBool,
}

impl LocationSyncSession {
    pub fn new(
        config: SyncConfig,
        source: Arc<dyn PositionSource>,
        transport: Arc<dyn PresenceTransport>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                source,
                transport,
                identity: RwLock::new(None),
                position: RwLock::new(None),
                roster: RwLock::new(Roster::new()),
                running: AtomicBool::new(false),
            }),
            driver: Mutex::new(None),
        }
    }

    /// Start the driver task.
    ///
    /// Repeated calls within one session lifetime are no-ops.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            tracing::debug!("Session already started");
            return;
        }

        let inner = self.inner.clone();
        *self.driver.lock() = Some(tokio::spawn(async move { inner.run().await }));

        tracing::info!(
            interval_ms = self.inner.config.update_interval.as_millis() as u64,
            "Location sync session started"
        );
    }

    /// Stop the session: cancel the capture timer and close the connection.
    ///
    /// No capture attempt or transmission happens after this returns; a
    /// position fix still in flight is dropped. Calling stop on a session
    /// that never started, or twice, is a no-op.
    pub async fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);

        let handle = self.driver.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
            self.inner.transport.shutdown();
            tracing::info!("Location sync session stopped");
        }
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.inner.identity.read().clone(),
            position: *self.inner.position.read(),
            roster: self.inner.roster.read().clone(),
        }
    }
}

impl SessionInner {
    async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.config.update_interval);
        let mut roster_rx = self.transport.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => self.capture_and_publish().await,
                update = roster_rx.recv() => match update {
                    Ok(roster) => self.replace_roster(roster),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Roster receiver lagged, snapshots dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Transport event channel closed");
                        break;
                    }
                },
            }
        }
    }

    /// One capture tick: read the device position and report it.
    ///
    /// A failed capture is logged and swallowed; identity and the
    /// last-known position stay as they were and nothing is transmitted.
    async fn capture_and_publish(&self) {
        let position = match self.source.current_position(&self.config.capture).await {
            Ok(position) => position,
            Err(error) => {
                tracing::warn!(error = %error, "Location capture failed");
                return;
            }
        };

        // The fix may have resolved after stop(); drop it instead of
        // transmitting past teardown.
        if !self.running.load(Ordering::SeqCst) {
            tracing::debug!("Discarding location fix after stop");
            return;
        }

        let id = self.identity_or_assign();
        *self.position.write() = Some(position);

        let update = LocationUpdate {
            location: position,
            id,
        };
        if let Err(error) = self.transport.publish_location(update).await {
            tracing::warn!(error = %error, "Failed to publish location");
        }
    }

    /// Return the session identity, assigning it on the first successful
    /// capture. The id never changes afterwards.
    fn identity_or_assign(&self) -> String {
        let mut identity = self.identity.write();
        match identity.as_ref() {
            Some(existing) => existing.id.clone(),
            None => {
                let assigned = LocalIdentity::generate();
                tracing::info!(id = %assigned.id, "Assigned local identity");
                let id = assigned.id.clone();
                *identity = Some(assigned);
                id
            }
        }
    }

    /// Replace the roster wholesale; entries are never merged.
    fn replace_roster(&self, roster: Roster) {
        *self.roster.write() = roster;
    }
}
