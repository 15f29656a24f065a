//! WebSocket presence transport.
//!
//! One driver task owns the socket: outbound events flow through an
//! unbounded channel to the writer half, inbound text frames are decoded
//! and fanned out on a broadcast channel. Reconnection lives entirely in
//! the driver; callers only ever see per-publish errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use super::events::{ClientEvent, ServerEvent};
use crate::domain::{LocationUpdate, PresenceTransport, Roster, TransportError};

/// Capacity of the inbound roster fan-out.
const ROSTER_CHANNEL_CAPACITY: usize = 16;

/// WebSocket-backed connection to the presence server.
pub struct WsPresenceTransport {
    outbound: mpsc::UnboundedSender<ClientEvent>,
    roster_tx: broadcast::Sender<Roster>,
    connected: Arc<AtomicBool>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl WsPresenceTransport {
    /// Spawn the connection driver.
    ///
    /// Returns immediately; the driver keeps retrying with `retry_delay`
    /// between attempts until it reaches the server, and falls back to the
    /// same retry loop whenever the connection drops.
    pub fn connect(url: String, retry_delay: Duration) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (roster_tx, _) = broadcast::channel(ROSTER_CHANNEL_CAPACITY);
        let connected = Arc::new(AtomicBool::new(false));

        let driver = tokio::spawn(drive(
            url,
            retry_delay,
            outbound_rx,
            roster_tx.clone(),
            connected.clone(),
        ));

        Self {
            outbound,
            roster_tx,
            connected,
            driver: Mutex::new(Some(driver)),
        }
    }
}

#[async_trait]
impl PresenceTransport for WsPresenceTransport {
    async fn publish_location(&self, update: LocationUpdate) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }

        self.outbound
            .send(ClientEvent::UserLocation(update))
            .map_err(|_| TransportError::Closed)
    }

    fn subscribe(&self) -> broadcast::Receiver<Roster> {
        self.roster_tx.subscribe()
    }

    fn shutdown(&self) {
        self.connected.store(false, Ordering::SeqCst);
        if let Some(driver) = self.driver.lock().take() {
            driver.abort();
        }
    }
}

/// Connection driver: connect, pump frames both ways, reconnect on loss.
async fn drive(
    url: String,
    retry_delay: Duration,
    mut outbound: mpsc::UnboundedReceiver<ClientEvent>,
    roster_tx: broadcast::Sender<Roster>,
    connected: Arc<AtomicBool>,
) {
    loop {
        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                let conn_id = Uuid::new_v4();
                tracing::info!(conn = %conn_id, url = %url, "Connected to presence server");
                connected.store(true, Ordering::SeqCst);

                // Updates queued while offline are stale; drop them.
                while outbound.try_recv().is_ok() {}

                let (mut sink, mut source) = stream.split();
                loop {
                    tokio::select! {
                        frame = source.next() => match frame {
                            Some(Ok(Message::Text(text))) => handle_frame(&text, &roster_tx),
                            Some(Ok(Message::Close(_))) | None => {
                                tracing::debug!(conn = %conn_id, "Server closed the connection");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(error)) => {
                                tracing::warn!(conn = %conn_id, error = %error, "WebSocket error");
                                break;
                            }
                        },
                        event = outbound.recv() => match event {
                            Some(event) => {
                                let text = match serde_json::to_string(&event) {
                                    Ok(text) => text,
                                    Err(error) => {
                                        tracing::error!(error = %error, "Failed to serialize event");
                                        continue;
                                    }
                                };
                                if sink.send(Message::Text(text)).await.is_err() {
                                    break;
                                }
                            }
                            // Transport handle dropped; nothing left to send.
                            None => return,
                        },
                    }
                }

                connected.store(false, Ordering::SeqCst);
                tracing::info!(conn = %conn_id, "Disconnected from presence server, retrying");
            }
            Err(error) => {
                tracing::debug!(url = %url, error = %error, "Presence server not reachable");
            }
        }

        tokio::time::sleep(retry_delay).await;
    }
}

/// Decode one inbound text frame and fan it out.
fn handle_frame(text: &str, roster_tx: &broadcast::Sender<Roster>) {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(ServerEvent::UpdateLocations(roster)) => {
            tracing::debug!(participants = roster.len(), "Roster snapshot received");
            // A failed send just means nobody is subscribed yet.
            let _ = roster_tx.send(roster);
        }
        Err(error) => {
            tracing::warn!(error = %error, "Ignoring unrecognized server event");
        }
    }
}
