use crate::value::Lbl;
use serde::Deserialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};

/// Initial process-wide path depth: basename only.
pub const DEFAULT_PATH_DEPTH: i32 = 0;

static PATH_DEPTH: AtomicI32 = AtomicI32::new(DEFAULT_PATH_DEPTH);

const FRAME_SEPARATOR: &str = "\n\t";

const ANCHOR: &str = concat!(module_path!(), "::stack_above");

macro_rules! entry {
    ($path:literal) => {
        concat!(env!("CARGO_CRATE_NAME"), "::", $path)
    };
}

// Functions that forward a trace request on behalf of their caller. Level 0
// is the first frame past a run of these, whichever of them were optimized
// into tail calls or inlined.
const ENTRY_POINTS: &[&str] = &[
    ANCHOR,
    entry!("trace::trace::trace_above"),
    entry!("trace::trace::caller_function"),
    entry!("trace::trace::trace_depth"),
    entry!("trace::trace::trace"),
    entry!("trace::trace::line"),
    entry!("trace::trace::call_line"),
    entry!("logger::logger::Logger::emit"),
    entry!("logger::logger::Logger::call_site"),
    entry!("logger::logger::Logger::debug"),
    entry!("logger::logger::Logger::info"),
    entry!("logger::logger::Logger::error"),
    entry!("logger::logger::Logger::check"),
    entry!("logger::logger::Logger::panic"),
    entry!("logger::logger::Logger::fatal"),
    entry!("global::global::debug"),
    entry!("global::global::info"),
    entry!("global::global::error"),
    entry!("global::global::panic"),
    entry!("global::global::fatal"),
];

/// Path depth used by [`trace`], [`line`], [`call_line`] and by error lines
/// of loggers without a trace window.
pub fn path_depth() -> i32 {
    PATH_DEPTH.load(Ordering::Relaxed)
}

/// Changes [`path_depth`] for the whole process.
pub fn set_path_depth(depth: i32) {
    PATH_DEPTH.store(depth, Ordering::Relaxed);
}

/// One resolved call-stack entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: Option<PathBuf>,
    pub line: u32,
    pub function: String,
}

impl Frame {
    /// Renders `file:line function`, keeping `path_depth` directories of the file.
    pub fn render(&self, path_depth: i32) -> String {
        let file = match &self.file {
            Some(file) => shorten_path(file, path_depth),
            None => "??".to_string(),
        };
        format!("{}:{} {}", file, self.line, self.function)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(-1))
    }
}

/// Keeps the basename plus `path_depth` parent directories.
///
/// A negative depth keeps the whole path. A path with fewer components than
/// requested is returned whole.
pub fn shorten_path(path: &Path, path_depth: i32) -> String {
    if path_depth < 0 {
        return path.display().to_string();
    }
    let parts: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    let keep = path_depth as usize + 1;
    if keep >= parts.len() {
        return path.display().to_string();
    }
    parts[parts.len() - keep..]
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// The `(start, end, path_depth)` triple a logger uses to annotate its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceWindow {
    pub start: i32,
    pub end: i32,
    #[serde(default)]
    pub path_depth: i32,
}

impl TraceWindow {
    pub fn new(start: i32, end: i32, path_depth: i32) -> Self {
        Self {
            start,
            end,
            path_depth,
        }
    }
}

/// Selects the slice of `frames` described by `start` and `end`.
///
/// `frames` lists the stack from level 0 outward.
///
/// A non-negative `start` drops that many frames from the near end. A
/// negative `start` keeps only the last `|start|` frames. A positive `end`
/// keeps that many frames from the (already trimmed) near end; a negative
/// `end` drops `|end|` frames from the far end. `end == 0` selects nothing,
/// and so does a negative `start` combined with a non-negative `end`.
pub fn select_window<T>(frames: &[T], start: i32, end: i32) -> Option<&[T]> {
    if end == 0 || (start < 0 && end >= 0) {
        return None;
    }

    if start >= 0 && end == 1 {
        let at = start as usize;
        return frames.get(at..at + 1);
    }

    let mut lines = frames.get(start.max(0) as usize..).unwrap_or(&[]);

    if start < 0 {
        let from = (lines.len() as i64 + start as i64).max(0) as usize;
        lines = &lines[from..];
    }

    let mut end = end as i64;
    if end < 0 {
        end += lines.len() as i64;
        if end <= 0 {
            return None;
        }
    }
    if (end as usize) < lines.len() {
        lines = &lines[..end as usize];
    }

    if lines.is_empty() { None } else { Some(lines) }
}

/// Formats a window of the current call stack.
///
/// Level 0 is the function calling `trace_depth`. A single frame (`end == 1`
/// with `start >= 0`) renders as `file:line function`; several frames render
/// as an indented block, one frame per line. Walking past the top of the
/// stack truncates the result; nothing found yields `None`.
#[inline(never)]
pub fn trace_depth(start: i32, end: i32, path_depth: i32) -> Option<Lbl> {
    trace_above(start, end, path_depth)
}

/// [`trace_depth`] with the process-wide [`path_depth`].
#[inline(never)]
pub fn trace(start: i32, end: i32) -> Option<Lbl> {
    trace_above(start, end, path_depth())
}

/// The caller's own position.
#[inline(never)]
pub fn line() -> Option<Lbl> {
    trace_above(0, 1, path_depth())
}

/// The frame `above` levels over the caller; `call_line(0)` equals [`line`].
#[inline(never)]
pub fn call_line(above: usize) -> Option<Lbl> {
    trace_above(above as i32, 1, path_depth())
}

/// Applies the window to the stack above the crate's entry points.
#[inline(never)]
pub(crate) fn trace_above(start: i32, end: i32, path_depth: i32) -> Option<Lbl> {
    if end == 0 || (start < 0 && end >= 0) {
        return None;
    }

    let frames = stack_above();
    let selected = select_window(&frames, start, end)?;
    if start >= 0 && end == 1 {
        return Some(Lbl(selected[0].render(path_depth)));
    }

    let rendered: Vec<String> = selected.iter().map(|f| f.render(path_depth)).collect();
    Some(Lbl(format!(
        "{}{}",
        FRAME_SEPARATOR,
        rendered.join(FRAME_SEPARATOR)
    )))
}

/// Name of the function that called into the crate.
#[inline(never)]
pub(crate) fn caller_function() -> Option<String> {
    stack_above()
        .into_iter()
        .next()
        .map(|frame| frame.function)
        .filter(|function| function != "??")
}

/// The stack from level 0 outward: everything past this function and the
/// run of entry points that led to it.
#[inline(never)]
fn stack_above() -> Vec<Frame> {
    let mut stack = capture();
    let Some(anchor) = stack
        .iter()
        .position(|frame| symbol_path(&frame.function) == ANCHOR)
    else {
        return Vec::new();
    };
    let level_zero = stack[anchor..]
        .iter()
        .position(|frame| !is_entry_point(&frame.function))
        .map_or(stack.len(), |offset| anchor + offset);
    stack.split_off(level_zero)
}

fn is_entry_point(function: &str) -> bool {
    let path = symbol_path(function);
    ENTRY_POINTS.contains(&path.as_str())
}

/// `<a::B>::f::<T>` and `a::B::f` both become `a::B::f`.
fn symbol_path(function: &str) -> String {
    let function = function.split("::<").next().unwrap_or(function);
    function.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Resolves the whole stack, innermost first, one entry per logical frame.
/// Inlined calls resolve to several symbols on one physical frame and each
/// becomes its own entry.
fn capture() -> Vec<Frame> {
    let mut frames = Vec::new();
    backtrace::trace(|raw| {
        let before = frames.len();
        backtrace::resolve_frame(raw, |symbol| {
            frames.push(Frame {
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno().unwrap_or(0),
                function: symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_else(|| "??".to_string()),
            });
        });
        if frames.len() == before {
            frames.push(Frame {
                file: None,
                line: 0,
                function: "??".to_string(),
            });
        }
        true
    });
    frames
}
