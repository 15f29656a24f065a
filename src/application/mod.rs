//! Application Layer
//!
//! Hosts the location sync session: the capture-and-publish loop plus the
//! live roster view, wired to the domain seams.

pub mod sync;

pub use sync::{LocationSyncSession, SessionSnapshot, SyncConfig};
