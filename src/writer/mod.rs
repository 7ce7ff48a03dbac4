//! The output destination shared by a family of loggers.

mod writer;
pub use writer::*;
