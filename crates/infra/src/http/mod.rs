//! HTTP transport for the build server
//!
//! Credentials, content type and optional TLS client identity are fixed when
//! the client is built; every request made through it carries them.

pub mod client;
pub mod identity;

pub use client::{HttpClient, HttpClientBuilder};
pub use identity::ClientIdentity;
