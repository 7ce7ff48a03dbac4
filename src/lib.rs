pub mod bridge;
pub mod error;
pub mod file;
pub mod global;
pub mod logger;
pub mod settings;
pub mod trace;
pub mod value;
pub mod writer;

pub use error::LogError;
pub use file::Contents;
pub use logger::{Level, Logger};
pub use trace::{Frame, TraceWindow, call_line, line, trace_depth};
pub use value::{Format, KV, Lbl, Loggable, Value};
pub use writer::{MemorySink, Sink, WriterCell};
