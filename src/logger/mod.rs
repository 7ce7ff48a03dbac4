//! Loggers sharing one writer, with inherited context and optional stack
//! traces. See `bin/logger_demo.rs` for a binary exercising the whole API.

mod logger;
mod macros;
pub use logger::*;
