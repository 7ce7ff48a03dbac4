use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("cannot open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot close log sink: {0}")]
    Close(#[source] io::Error),
    #[error("invalid log settings: {0}")]
    Config(#[from] config::ConfigError),
    #[error("cannot install tracing bridge: {0}")]
    Bridge(String),
}
