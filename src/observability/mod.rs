//! Observability module providing structured logging for the command-line
//! front end.
//!
//! The library itself only emits `tracing` events and spans; installing a
//! subscriber is left to the binary.

mod tracing_init;

pub use tracing_init::*;
