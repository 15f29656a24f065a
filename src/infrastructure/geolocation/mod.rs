//! Position source implementations.

mod fixed;
mod gpsd;

pub use fixed::FixedSource;
pub use gpsd::GpsdSource;
