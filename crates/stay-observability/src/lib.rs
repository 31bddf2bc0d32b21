//! Observability for the accommodation reviews front end.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with request context
//! - `LogSink` - Where formatted entries go (stderr, or memory in tests)

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;

// Re-export RequestId from stay-core for convenience
pub use stay_core::RequestId;
