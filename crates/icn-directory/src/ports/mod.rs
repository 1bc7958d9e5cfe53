//! Ports module
//!
//! Hexagonal architecture: inbound use cases and outbound infrastructure.

pub mod inbound;
pub mod outbound;
