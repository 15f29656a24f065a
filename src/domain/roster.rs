//! Roster state and the presence transport seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::position::Position;

/// One known participant, as last reported by the presence server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub location: Position,
}

/// Full set of known participants, in server order.
///
/// Replaced wholesale on every push; entries are never merged, deduplicated
/// or aged out on the client.
pub type Roster = Vec<RosterEntry>;

/// Outbound location report payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub location: Position,
    pub id: String,
}

/// Transport-level failures.
///
/// Connection loss itself is handled by the transport's own reconnection;
/// callers only see these per-operation errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected to the presence server")]
    NotConnected,

    #[error("transport closed")]
    Closed,
}

/// Persistent, bidirectional connection to the presence server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceTransport: Send + Sync {
    /// Fire-and-forget report of the local position.
    async fn publish_location(&self, update: LocationUpdate) -> Result<(), TransportError>;

    /// Subscribe to roster snapshots pushed by the server.
    fn subscribe(&self) -> broadcast::Receiver<Roster>;

    /// Tear the connection down; further publishes fail.
    fn shutdown(&self);
}
