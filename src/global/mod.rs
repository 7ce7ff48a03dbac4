//! The process-wide logger and its free-function facade.
//!
//! The instance lives in one place: a lock-protected slot in this module,
//! holding a stdout logger until [`install`] injects the one built at program
//! start. Each free function delegates to whatever is installed at the time
//! of the call.

mod global;
pub use global::*;
