use crate::error::LogError;
use crate::logger::Logger;
use crate::writer::Sink;
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// What happens to a log file that already has contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contents {
    #[default]
    Append,
    Truncate,
}

/// `<program>.log`, named after the running executable.
pub fn default_file_name() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| log_name_for(&exe))
        .or_else(|| {
            std::env::args_os()
                .next()
                .and_then(|arg0| log_name_for(Path::new(&arg0)))
        })
        .unwrap_or_else(|| PathBuf::from("quill.log"))
}

/// The file name up to its first dot, plus `.log`: `app.v2.bin` gives `app.log`.
fn log_name_for(program: &Path) -> Option<PathBuf> {
    let name = program.file_name()?.to_string_lossy();
    let stem = name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return None;
    }
    Some(PathBuf::from(format!("{stem}.log")))
}

/// Opens `path` (or [`default_file_name`] in the working directory) for
/// writing, creating it if needed.
pub fn open(path: Option<&Path>, contents: Contents) -> Result<File, LogError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_file_name(),
    };

    let mut options = OpenOptions::new();
    options.create(true);
    match contents {
        Contents::Append => options.append(true),
        Contents::Truncate => options.write(true).truncate(true),
    };

    let file = options.open(&path).map_err(|source| LogError::Open {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?contents, "opened log file");
    Ok(file)
}

impl Logger {
    /// A logger writing to a file; `close` releases the file handle.
    pub fn file(path: Option<&Path>, contents: Contents) -> Result<Logger, LogError> {
        let file = open(path, contents)?;
        Ok(Logger::new(Sink::closable(file)))
    }
}
