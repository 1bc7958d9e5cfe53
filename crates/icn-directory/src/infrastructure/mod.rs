//! Infrastructure layer
//!
//! Concrete implementations of the outbound ports.

pub mod persistence;
pub mod latency;

pub use persistence::{InMemoryCompanyRepository, NoOpEventPublisher, RecordingEventPublisher};
pub use latency::SimulatedLatency;
