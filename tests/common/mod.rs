//! Common Test Utilities
//!
//! An in-process fake presence server and a scripted position source for
//! end-to-end session tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use geoshare::domain::{
    CaptureOptions, GeolocationError, LocationUpdate, Position, PositionSource, RosterEntry,
};
use geoshare::infrastructure::transport::events::{ClientEvent, ServerEvent};

/// In-process stand-in for the presence server.
///
/// Accepts WebSocket clients, records every `userLocation` report, and can
/// push `updateLocations` snapshots to all connected clients.
pub struct FakePresenceServer {
    addr: SocketAddr,
    locations: Mutex<mpsc::UnboundedReceiver<LocationUpdate>>,
    clients: Arc<Mutex<Vec<mpsc::UnboundedSender<Message>>>>,
    accept_task: JoinHandle<()>,
}

impl FakePresenceServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake presence server");
        let addr = listener.local_addr().expect("local addr");

        let (locations_tx, locations_rx) = mpsc::unbounded_channel();
        let clients: Arc<Mutex<Vec<mpsc::UnboundedSender<Message>>>> =
            Arc::new(Mutex::new(Vec::new()));

        let accept_clients = clients.clone();
        let accept_task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let locations_tx = locations_tx.clone();
                let clients = accept_clients.clone();
                tokio::spawn(handle_client(stream, locations_tx, clients));
            }
        });

        Self {
            addr,
            locations: Mutex::new(locations_rx),
            clients,
            accept_task,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Next `userLocation` report, or None if the deadline passes.
    pub async fn recv_location(&self, deadline: Duration) -> Option<LocationUpdate> {
        let mut locations = self.locations.lock().await;
        tokio::time::timeout(deadline, locations.recv())
            .await
            .ok()
            .flatten()
    }

    /// Push a roster snapshot to every connected client.
    pub async fn push_roster(&self, roster: Vec<RosterEntry>) {
        let frame =
            serde_json::to_string(&ServerEvent::UpdateLocations(roster)).expect("serialize roster");
        let clients = self.clients.lock().await;
        for client in clients.iter() {
            let _ = client.send(Message::Text(frame.clone()));
        }
    }

    pub fn shutdown(&self) {
        self.accept_task.abort();
    }
}

async fn handle_client(
    stream: TcpStream,
    locations_tx: mpsc::UnboundedSender<LocationUpdate>,
    clients: Arc<Mutex<Vec<mpsc::UnboundedSender<Message>>>>,
) {
    let Ok(socket) = accept_async(stream).await else {
        return;
    };
    let (mut sink, mut source) = socket.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    clients.lock().await.push(outbound_tx);

    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(ClientEvent::UserLocation(update)) =
                        serde_json::from_str::<ClientEvent>(&text)
                    {
                        let _ = locations_tx.send(update);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
            message = outbound_rx.recv() => match message {
                Some(message) => {
                    if sink.send(message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}

/// Position source returning a fixed script of results, then a fallback
/// position forever.
pub struct ScriptedSource {
    script: std::sync::Mutex<Vec<Result<Position, GeolocationError>>>,
    fallback: Position,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Position, GeolocationError>>, fallback: Position) -> Self {
        let mut script = script;
        // Consumed by pop() from the back.
        script.reverse();
        Self {
            script: std::sync::Mutex::new(script),
            fallback,
        }
    }
}

#[async_trait]
impl PositionSource for ScriptedSource {
    async fn current_position(
        &self,
        _options: &CaptureOptions,
    ) -> Result<Position, GeolocationError> {
        match self.script.lock().unwrap().pop() {
            Some(result) => result,
            None => Ok(self.fallback),
        }
    }
}
