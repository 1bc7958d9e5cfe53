//! Domain module
//!
//! Company aggregate, normalization value objects and domain events.

pub mod aggregates;
pub mod value_objects;
pub mod events;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
