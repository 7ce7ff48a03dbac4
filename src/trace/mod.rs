//! Call-stack annotation for log lines.
//!
//! Levels are counted outward from the function that asked for the trace:
//! level 0 is that function, level 1 its caller, and so on. Level 0 is the
//! first frame past the crate's own entry points rather than a fixed number
//! of frames down, so tail calls and inlining do not shift the window.

mod trace;
pub use trace::*;
