//! # Geoshare Client Library
//!
//! This crate provides a real-time location-sharing client with:
//! - Periodic geolocation capture against the platform location service
//! - Fire-and-forget location reports over a persistent WebSocket
//! - A live roster of participant positions projected into a map view
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core types and the position-source/transport seams
//! - **Application Layer**: The location sync session
//! - **Infrastructure Layer**: gpsd and WebSocket implementations
//! - **Presentation Layer**: Map view projection
//!
//! ## Module Structure
//!
//! ```text
//! geoshare/
//! +-- config/        Configuration management
//! +-- domain/        Core types and seam traits
//! +-- application/   The location sync session
//! +-- infrastructure/ Position source and transport implementations
//! +-- presentation/  Map view projection
//! +-- shared/        Common utilities (errors, identity tokens)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core types and seams
pub mod domain;

// Application layer - The sync session
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - Map projection
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
