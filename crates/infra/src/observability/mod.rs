//! Observability infrastructure
//!
//! Structured diagnostics through `tracing`. Poll loops log at `debug` per
//! iteration and at `info` on state transitions.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
