use crate::error::LogError;
use crate::trace::{self, TraceWindow};
use crate::value::{Format, Value};
use crate::writer::{Sink, WriterCell};
use serde::Deserialize;
use std::fmt::{self, Display};
use std::panic::Location;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Error,
    Panic,
    Fatal,
}

impl Level {
    pub fn flag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    // Error and panic lines carry their own call-site token instead.
    fn takes_trace(self) -> bool {
        !matches!(self, Level::Error | Level::Panic)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Levels that get the configured trace window unless told otherwise.
pub const DEFAULT_TRACE_LEVELS: [Level; 2] = [Level::Info, Level::Fatal];

/// Writes one line per entry: `timestamp FLAG [trace] [context] args...`.
///
/// Children made with [`Logger::child`] share the parent's writer cell, so
/// [`Logger::set_sink`] on any member of a family redirects all of them.
/// Context, debug flag and trace window are copied at creation and stay
/// independent afterwards.
///
/// `Logger::default()` is the absent logger: it has no writer and every
/// operation on it is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    cell: Option<Arc<WriterCell>>,
    context: String,
    debug: bool,
    trace: Option<TraceWindow>,
    trace_levels: Vec<Level>,
    format: Format,
}

impl Logger {
    pub fn new(sink: impl Into<Sink>) -> Self {
        Self::with_format(sink, Format::default())
    }

    pub fn with_format(sink: impl Into<Sink>, format: Format) -> Self {
        Self {
            cell: Some(WriterCell::new(Some(sink.into()))),
            context: String::new(),
            debug: false,
            trace: None,
            trace_levels: DEFAULT_TRACE_LEVELS.to_vec(),
            format,
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.cell.is_none()
    }

    /// A logger on the same writer whose lines start with this logger's
    /// context followed by `values`.
    pub fn child(&self, values: &[Value]) -> Logger {
        if self.cell.is_none() {
            return Logger::default();
        }
        let mut context = self.context.clone();
        for value in values {
            if !context.is_empty() {
                context.push(' ');
            }
            self.format.render_into(&mut context, value);
        }
        Logger {
            cell: self.cell.clone(),
            context,
            debug: self.debug,
            trace: self.trace,
            trace_levels: self.trace_levels.clone(),
            format: self.format.clone(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub(crate) fn cell(&self) -> Option<&Arc<WriterCell>> {
        self.cell.as_ref()
    }

    /// Redirects this logger and every logger sharing its writer.
    pub fn set_sink(&self, sink: impl Into<Sink>) {
        if let Some(cell) = &self.cell {
            cell.set_sink(Some(sink.into()));
        }
    }

    /// Drops the sink; subsequent writes are silently discarded.
    pub fn mute(&self) {
        if let Some(cell) = &self.cell {
            cell.set_sink(None);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.cell.as_ref().is_none_or(|cell| cell.is_muted())
    }

    pub fn set_debug(&mut self, debug: bool) {
        if self.cell.is_some() {
            self.debug = debug;
        }
    }

    pub fn get_debug(&self) -> bool {
        self.cell.is_some() && self.debug
    }

    /// Annotates lines with a window of the caller's stack; level 0 is the
    /// function calling the logging method. See [`trace::select_window`].
    pub fn set_trace(&mut self, start: i32, end: i32, path_depth: i32) {
        self.trace = Some(TraceWindow::new(start, end, path_depth));
    }

    pub fn clear_trace(&mut self) {
        self.trace = None;
    }

    pub fn trace_window(&self) -> Option<TraceWindow> {
        self.trace
    }

    pub fn set_trace_levels(&mut self, levels: &[Level]) {
        self.trace_levels = levels.to_vec();
    }

    /// Flushes the writer and closes it when it owns its handle.
    pub fn close(&self) -> Result<(), LogError> {
        match &self.cell {
            Some(cell) => cell.close().map_err(LogError::Close),
            None => Ok(()),
        }
    }

    #[inline(never)]
    pub fn debug(&self, values: &[Value]) {
        if self.debug {
            self.emit(Level::Debug, values);
        }
    }

    #[inline(never)]
    pub fn info(&self, values: &[Value]) {
        self.emit(Level::Info, values);
    }

    /// Logs `err` with the caller's position. Returns whether there was an
    /// error to log.
    #[track_caller]
    pub fn error<E: Display>(&self, err: Option<E>) -> bool {
        let Some(err) = err else {
            return false;
        };
        if self.is_muted() {
            return true;
        }
        let site = self.call_site(Location::caller());
        self.emit(Level::Error, &[site, Value::quoted(err)]);
        true
    }

    /// [`Logger::error`] for the error arm of `result`.
    #[track_caller]
    pub fn check<T, E: Display>(&self, result: &Result<T, E>) -> bool {
        self.error(result.as_ref().err())
    }

    /// Logs `err`, closes the writer and panics with its text.
    #[track_caller]
    pub fn panic<E: Display>(&self, err: Option<E>) {
        let Some(err) = err else {
            return;
        };
        let text = err.to_string();
        let site = self.call_site(Location::caller());
        self.emit(Level::Panic, &[site, Value::Quoted(text.clone())]);
        let _ = self.close();
        panic!("{text}");
    }

    /// Logs `values`, closes the writer and exits the process with status 1.
    #[inline(never)]
    pub fn fatal(&self, values: &[Value]) -> ! {
        self.emit(Level::Fatal, values);
        let _ = self.close();
        std::process::exit(1)
    }

    /// `file:line function` of the caller; `file:line` when the stack has no
    /// symbols.
    #[inline(never)]
    fn call_site(&self, location: &Location<'_>) -> Value {
        let depth = self.trace.map_or_else(trace::path_depth, |t| t.path_depth);
        let file = trace::shorten_path(std::path::Path::new(location.file()), depth);
        let site = format!("{}:{}", file, location.line());
        match trace::caller_function() {
            Some(function) => Value::Label(format!("{site} {function}")),
            None => Value::Label(site),
        }
    }

    /// Builds and writes one line.
    #[inline(never)]
    pub(crate) fn emit(&self, level: Level, values: &[Value]) {
        let Some(cell) = &self.cell else {
            return;
        };
        if cell.is_muted() {
            return;
        }
        let token = match self.trace {
            Some(window) if level.takes_trace() && self.trace_levels.contains(&level) => {
                trace::trace_above(window.start, window.end, window.path_depth)
            }
            _ => None,
        };
        let line = self.assemble(level, token.as_ref().map(|t| t.as_str()), values);
        // Write failures are dropped so logging never masks the caller's error.
        let _ = cell.write(line.as_bytes());
    }

    fn assemble(&self, level: Level, token: Option<&str>, values: &[Value]) -> String {
        let mut line = self.format.timestamp();
        push_piece(&mut line, level.flag());
        if let Some(token) = token {
            push_piece(&mut line, token);
        }
        push_piece(&mut line, &self.context);

        let mut rendered = String::new();
        for value in values {
            rendered.clear();
            self.format.render_into(&mut rendered, value);
            push_piece(&mut line, &rendered);
        }
        line.push('\n');
        line
    }
}

fn push_piece(line: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(piece);
}
