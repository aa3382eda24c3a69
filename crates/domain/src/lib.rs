//! # Jenkins Trigger Domain
//!
//! Data model for triggering and following a remote build.
//!
//! This crate contains:
//! - Queued item, build and progressive log types
//! - The closed set of build results and its decoding table
//! - The error type and Result alias shared by every layer
//! - Configuration structures and protocol constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O; pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
