//! Logging abstractions for resolution diagnostics
//!
//! The factory and the provider lifecycle report through an injected
//! [`Logger`] instead of a global sink, so hosts decide where output goes.

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, LogLevel, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{LogEntry, MemoryLogger};
