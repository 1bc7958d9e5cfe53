//! Application module
//!
//! Use case orchestration: commands, queries and DTOs.

pub mod commands;
pub mod dto;
pub mod queries;

pub use commands::DirectoryService;
pub use dto::*;
