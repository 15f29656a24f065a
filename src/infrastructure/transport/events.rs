//! Wire events exchanged with the presence server.
//!
//! Every frame is a JSON object of the form `{ "event": ..., "data": ... }`
//! carried in a WebSocket text message.

use serde::{Deserialize, Serialize};

use crate::domain::{LocationUpdate, Roster};

/// Events emitted by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Periodic location report.
    #[serde(rename = "userLocation")]
    UserLocation(LocationUpdate),
}

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full roster snapshot; replaces any previous one.
    #[serde(rename = "updateLocations")]
    UpdateLocations(Roster),
}
