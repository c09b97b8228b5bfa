//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; fields over formatted strings
//! - Level configurable through RUST_LOG (env-filter)
//! - Key material and request bodies are never logged

pub mod logging;

pub use logging::init_logging;
