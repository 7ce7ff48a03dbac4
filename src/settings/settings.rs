use super::Cli;
use crate::error::LogError;
use crate::file::{self, Contents};
use crate::logger::{DEFAULT_TRACE_LEVELS, Level, Logger};
use crate::trace::{self, TraceWindow};
use crate::value::{DEFAULT_TIME_FORMAT, Format};
use crate::writer::Sink;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub debug: bool,
    pub time_format: String,
    pub output: Output,
    /// Used when `output = "file"`; defaults to `<program>.log`.
    pub file: Option<PathBuf>,
    pub contents: Contents,
    pub trace: Option<TraceWindow>,
    pub trace_levels: Vec<Level>,
    /// Process-wide depth for `line`, `trace` and error tokens; left as is when unset.
    pub path_depth: Option<i32>,
    /// `tracing` filter for the bridge; no bridge when unset.
    pub bridge_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            output: Output::default(),
            file: None,
            contents: Contents::default(),
            trace: None,
            trace_levels: DEFAULT_TRACE_LEVELS.to_vec(),
            path_depth: None,
            bridge_filter: None,
        }
    }
}

impl LogConfig {
    /// Command line flags win over file and environment settings.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.log_file {
            self.output = Output::File;
            self.file = Some(path.clone());
        }
        if cli.debug {
            self.debug = true;
        }
    }

    /// Opens the configured output and builds a logger from these settings.
    pub fn build(&self) -> Result<Logger, LogError> {
        let sink = match self.output {
            Output::Stdout => Sink::new(io::stdout()),
            Output::Stderr => Sink::new(io::stderr()),
            Output::File => Sink::closable(file::open(self.file.as_deref(), self.contents)?),
        };

        let mut logger = Logger::with_format(sink, Format::new(&self.time_format));
        logger.set_debug(self.debug);
        if let Some(window) = self.trace {
            logger.set_trace(window.start, window.end, window.path_depth);
        }
        logger.set_trace_levels(&self.trace_levels);
        if let Some(depth) = self.path_depth {
            trace::set_path_depth(depth);
        }
        Ok(logger)
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release";

const ENV_PREFIX: &str = "QUILL";

/// Loads settings from `path` (required) or the default settings file
/// (optional), then `QUILL_*` environment variables.
pub fn parse_settings(path: Option<&str>) -> Result<LogConfig, LogError> {
    let source = match path {
        Some(path) => File::with_name(path),
        None => File::with_name(SETTINGS_PATH).required(false),
    };

    let settings: LogConfig = Config::builder()
        .add_source(source)
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.toml");
        fs::write(&path, "").unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings, LogConfig::default());
    }

    #[test]
    fn reads_every_field() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("log.toml");
        fs::write(
            &path,
            r#"
debug = true
time_format = "%H:%M:%S"
output = "file"
file = "app.log"
contents = "truncate"
trace_levels = ["info", "debug"]
path_depth = 2
bridge_filter = "info"

[trace]
start = 0
end = 3
path_depth = 1
"#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.time_format, "%H:%M:%S");
        assert_eq!(settings.output, Output::File);
        assert_eq!(settings.file, Some(PathBuf::from("app.log")));
        assert_eq!(settings.contents, Contents::Truncate);
        assert_eq!(settings.trace, Some(TraceWindow::new(0, 3, 1)));
        assert_eq!(settings.trace_levels, vec![Level::Info, Level::Debug]);
        assert_eq!(settings.path_depth, Some(2));
        assert_eq!(settings.bridge_filter.as_deref(), Some("info"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = parse_settings(Some("definitely/not/here.toml"));
        assert!(matches!(result, Err(LogError::Config(_))));
    }

    #[test]
    fn cli_overrides_output_and_debug() {
        let mut settings = LogConfig::default();
        let cli = Cli {
            settings: None,
            log_file: Some(PathBuf::from("cli.log")),
            debug: true,
        };
        settings.apply_cli(&cli);
        assert_eq!(settings.output, Output::File);
        assert_eq!(settings.file, Some(PathBuf::from("cli.log")));
        assert!(settings.debug);
    }

    #[test]
    fn build_applies_settings() {
        let temp = TempDir::new().unwrap();
        let settings = LogConfig {
            debug: true,
            output: Output::File,
            file: Some(temp.path().join("built.log")),
            trace: Some(TraceWindow::new(0, 1, 0)),
            ..LogConfig::default()
        };

        let logger = settings.build().unwrap();
        assert!(logger.get_debug());
        assert_eq!(logger.trace_window(), Some(TraceWindow::new(0, 1, 0)));
        logger.close().unwrap();
        assert!(temp.path().join("built.log").exists());
    }
}
