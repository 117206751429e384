//! Infrastructure layer: collaborator contracts and wiring
//!
//! This layer defines the boundary traits consumed by the core and
//! provides the in-memory reference implementations.

pub mod di;
pub mod error;
pub mod traits;

pub use error::TransportError;
