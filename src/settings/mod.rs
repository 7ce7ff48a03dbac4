//! Logger settings loaded from a file and the environment, plus the command
//! line flags that override them. See `bin/logger_demo.rs` for usage.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
