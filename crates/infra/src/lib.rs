//! # Jenkins Trigger Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The authenticated HTTP transport (Basic auth, optional mutual TLS)
//! - The `JenkinsApi` implementation over that transport
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `jenkins-trigger-core`
//! - Contains all "impure" code (network, filesystem, global subscriber)

pub mod config;
pub mod errors;
pub mod http;
pub mod jenkins;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{ClientIdentity, HttpClient, HttpClientBuilder};
pub use jenkins::JenkinsClient;
pub use observability::{init_tracing, LogFormat};
