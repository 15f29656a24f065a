//! Session lifecycle tests against the fake presence server.
//!
//! These drive the real WebSocket transport end to end: the session
//! captures scripted positions, reports them over the wire, and receives
//! roster snapshots pushed by the fake server.

use std::sync::Arc;
use std::time::Duration;

use geoshare::application::{LocationSyncSession, SessionSnapshot, SyncConfig};
use geoshare::domain::{CaptureOptions, GeolocationError, Position, RosterEntry};
use geoshare::infrastructure::transport::WsPresenceTransport;
use geoshare::presentation::map::{self, MapView, MarkerKind};

use crate::common::{FakePresenceServer, ScriptedSource};

fn fast_config() -> SyncConfig {
    SyncConfig {
        update_interval: Duration::from_millis(25),
        capture: CaptureOptions::default(),
    }
}

/// Poll a session snapshot until the probe accepts it.
async fn wait_for_snapshot(
    session: &LocationSyncSession,
    probe: impl Fn(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    for _ in 0..200 {
        let snapshot = session.snapshot();
        if probe(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never reached the expected state");
}

#[tokio::test]
async fn test_session_reports_location_with_stable_id() {
    let server = FakePresenceServer::spawn().await;
    let transport = Arc::new(WsPresenceTransport::connect(
        server.url(),
        Duration::from_millis(25),
    ));
    let source = Arc::new(ScriptedSource::new(
        Vec::new(),
        Position::new(48.2, 16.37),
    ));
    let session = LocationSyncSession::new(fast_config(), source, transport);

    session.start();

    let first = server
        .recv_location(Duration::from_secs(5))
        .await
        .expect("first report");
    let second = server
        .recv_location(Duration::from_secs(5))
        .await
        .expect("second report");

    assert!(first.id.starts_with("User-"));
    assert_eq!(first.id, second.id);
    assert_eq!(first.location, Position::new(48.2, 16.37));

    session.stop().await;
    server.shutdown();
}

#[tokio::test]
async fn test_failed_captures_are_skipped_then_recovered() {
    let server = FakePresenceServer::spawn().await;
    let transport = Arc::new(WsPresenceTransport::connect(
        server.url(),
        Duration::from_millis(25),
    ));
    // First two captures fail; the session must stay quiet and recover.
    let source = Arc::new(ScriptedSource::new(
        vec![
            Err(GeolocationError::NoFix),
            Err(GeolocationError::Timeout(Duration::from_secs(5))),
        ],
        Position::new(1.0, 2.0),
    ));
    let session = LocationSyncSession::new(fast_config(), source, transport);

    session.start();

    let report = server
        .recv_location(Duration::from_secs(5))
        .await
        .expect("recovered report");
    assert_eq!(report.location, Position::new(1.0, 2.0));

    session.stop().await;
    server.shutdown();
}

#[tokio::test]
async fn test_roster_push_replaces_state_and_renders() {
    let server = FakePresenceServer::spawn().await;
    let transport = Arc::new(WsPresenceTransport::connect(
        server.url(),
        Duration::from_millis(25),
    ));
    let source = Arc::new(ScriptedSource::new(
        Vec::new(),
        Position::new(48.2, 16.37),
    ));
    let session = LocationSyncSession::new(fast_config(), source, transport);

    session.start();

    let report = server
        .recv_location(Duration::from_secs(5))
        .await
        .expect("report");

    // First snapshot includes the local participant plus one remote.
    server
        .push_roster(vec![
            RosterEntry {
                id: report.id.clone(),
                location: Position::new(48.2, 16.37),
            },
            RosterEntry {
                id: "User-remote".to_string(),
                location: Position::new(1.0, 2.0),
            },
        ])
        .await;
    wait_for_snapshot(&session, |snapshot| snapshot.roster.len() == 2).await;

    // A second snapshot fully replaces the first; no stale entries survive.
    server
        .push_roster(vec![RosterEntry {
            id: "User-other".to_string(),
            location: Position::new(3.0, 4.0),
        }])
        .await;
    let snapshot = wait_for_snapshot(&session, |snapshot| {
        snapshot.roster.len() == 1 && snapshot.roster[0].id == "User-other"
    })
    .await;

    let MapView::Ready(scene) = map::render(&snapshot) else {
        panic!("expected a ready scene");
    };
    assert_eq!(scene.connected_count, 1);
    assert_eq!(scene.markers.len(), 2);
    assert_eq!(scene.markers[0].kind, MarkerKind::Local);
    assert_eq!(scene.markers[0].id, report.id);
    assert_eq!(scene.markers[1].id, "User-other");

    session.stop().await;
    server.shutdown();
}

#[tokio::test]
async fn test_no_reports_after_stop() {
    let server = FakePresenceServer::spawn().await;
    let transport = Arc::new(WsPresenceTransport::connect(
        server.url(),
        Duration::from_millis(25),
    ));
    let source = Arc::new(ScriptedSource::new(Vec::new(), Position::new(1.0, 2.0)));
    let session = LocationSyncSession::new(fast_config(), source, transport);

    session.start();
    server
        .recv_location(Duration::from_secs(5))
        .await
        .expect("session connected and reporting");

    session.stop().await;

    // Drain anything that was already in flight, then expect silence.
    while server
        .recv_location(Duration::from_millis(200))
        .await
        .is_some()
    {}
    assert!(server
        .recv_location(Duration::from_millis(300))
        .await
        .is_none());

    server.shutdown();
}
