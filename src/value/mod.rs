//! Rendering of log arguments into the text that lands on a log line.

mod value;
pub use value::*;
