//! Presentation Layer
//!
//! Map view projection. Pure functions over session snapshots; no state
//! of its own.

pub mod map;
