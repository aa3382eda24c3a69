//! Error plumbing between third-party crates and `TriggerError`.

pub mod conversions;

pub use conversions::InfraError;
