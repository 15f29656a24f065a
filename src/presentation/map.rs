//! Map view projection.

use crate::application::SessionSnapshot;
use crate::domain::Position;

/// Default map zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// What the host should render.
#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    /// No position fix yet; show a placeholder instead of the map.
    Loading,

    /// Interactive map scene.
    Ready(MapScene),
}

/// A renderable map scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    /// Map center (the local position).
    pub center: Position,

    pub zoom: u8,

    /// Self marker first, then one marker per remote participant.
    pub markers: Vec<Marker>,

    /// Number of participants in the last roster snapshot.
    pub connected_count: usize,
}

/// One map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub position: Position,
    pub kind: MarkerKind,

    /// Popup text shown when the marker is selected.
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Local,
    Remote,
}

/// Project session state into a display list.
///
/// The self marker is always present once a position is known. Roster
/// entries matching the local id are filtered here, at the display layer;
/// the roster itself may still contain the local participant.
pub fn render(snapshot: &SessionSnapshot) -> MapView {
    let Some(position) = snapshot.position else {
        return MapView::Loading;
    };

    let local_id = snapshot
        .identity
        .as_ref()
        .map(|identity| identity.id.as_str())
        .unwrap_or_default();

    let mut markers = Vec::with_capacity(snapshot.roster.len() + 1);
    markers.push(Marker {
        id: local_id.to_string(),
        position,
        kind: MarkerKind::Local,
        popup: format!("You are here (ID: {})", local_id),
    });

    for entry in &snapshot.roster {
        if entry.id == local_id {
            continue;
        }
        markers.push(Marker {
            id: entry.id.clone(),
            position: entry.location,
            kind: MarkerKind::Remote,
            popup: format!("User ID: {}\nLocation: {}", entry.id, entry.location),
        });
    }

    MapView::Ready(MapScene {
        center: position,
        zoom: DEFAULT_ZOOM,
        markers,
        connected_count: snapshot.roster.len(),
    })
}
