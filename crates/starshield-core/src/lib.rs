//! Shared plumbing for StarShield services.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
