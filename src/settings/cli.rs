use super::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    /// Write the log to this file instead of the configured output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub debug: bool,
}
