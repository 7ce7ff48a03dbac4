//! Routes `tracing` events into the process logger, so libraries that log
//! through `tracing` end up on the same sink as everything else.

mod bridge;
pub use bridge::*;
