use crate::error::LogError;
use crate::file::{self, Contents};
use crate::logger::{Level, Logger};
use crate::value::Value;
use crate::writer::Sink;
use std::fmt::Display;
use std::io;
use std::path::Path;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

static DEFAULT: LazyLock<RwLock<Arc<Logger>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Logger::new(io::stdout()))));

/// Replaces the process logger. Loggers previously obtained from [`logger`]
/// or [`child`] keep writing where they did.
pub fn install(logger: Logger) {
    *DEFAULT.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(logger);
    tracing::debug!("default logger installed");
}

/// The currently installed process logger.
pub fn logger() -> Arc<Logger> {
    DEFAULT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn update(f: impl FnOnce(&mut Logger)) {
    let mut slot = DEFAULT.write().unwrap_or_else(PoisonError::into_inner);
    f(Arc::make_mut(&mut slot));
}

/// Redirects the process logger and every child made from it.
pub fn to(sink: impl Into<Sink>) {
    logger().set_sink(sink);
}

/// Redirects the process logger to a file, appending to existing contents.
pub fn to_file(path: Option<&Path>) -> Result<(), LogError> {
    to_file_with(path, Contents::default())
}

pub fn to_file_with(path: Option<&Path>, contents: Contents) -> Result<(), LogError> {
    let file = file::open(path, contents)?;
    logger().set_sink(Sink::closable(file));
    Ok(())
}

pub fn mute() {
    logger().mute();
}

pub fn close() -> Result<(), LogError> {
    logger().close()
}

pub fn child(values: &[Value]) -> Logger {
    logger().child(values)
}

pub fn set_debug(debug: bool) {
    update(|log| log.set_debug(debug));
}

pub fn get_debug() -> bool {
    logger().get_debug()
}

pub fn set_trace(start: i32, end: i32, path_depth: i32) {
    update(|log| log.set_trace(start, end, path_depth));
}

pub fn clear_trace() {
    update(|log| log.clear_trace());
}

#[inline(never)]
pub fn debug(values: &[Value]) {
    let log = logger();
    if log.get_debug() {
        log.emit(Level::Debug, values);
    }
}

#[inline(never)]
pub fn info(values: &[Value]) {
    logger().emit(Level::Info, values);
}

#[track_caller]
pub fn error<E: Display>(err: Option<E>) -> bool {
    logger().error(err)
}

#[track_caller]
pub fn panic<E: Display>(err: Option<E>) {
    logger().panic(err)
}

#[inline(never)]
pub fn fatal(values: &[Value]) -> ! {
    let log = logger();
    log.emit(Level::Fatal, values);
    let _ = log.close();
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::MemorySink;
    use crate::Loggable;
    use std::sync::Mutex;

    // The process logger is shared by every test in this binary.
    static SERIAL: Mutex<()> = Mutex::new(());

    #[test]
    fn facade_uses_installed_logger() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let mem = MemorySink::new();
        install(Logger::new(mem.clone()));

        info(&["hello".to_log_value()]);
        debug(&["hidden".to_log_value()]);
        set_debug(true);
        assert!(get_debug());
        debug(&["shown".to_log_value()]);
        set_debug(false);

        let out = mem.contents();
        assert!(out.contains(r#"INFO "hello""#));
        assert!(!out.contains("hidden"));
        assert!(out.contains(r#"DEBUG "shown""#));
    }

    #[test]
    fn facade_error_points_at_caller() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let mem = MemorySink::new();
        install(Logger::new(mem.clone()));

        assert!(!error(None::<&str>));
        let line = line!() + 1;
        assert!(error(Some("bad")));
        let out = mem.contents();
        assert!(out.contains(&format!("global.rs:{line} ")), "{out}");
        assert!(out.contains("facade_error_points_at_caller \"bad\""), "{out}");
    }

    #[test]
    fn to_rebinds_children_of_default() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        install(Logger::new(MemorySink::new()));
        let kid = child(&["kid".to_log_value()]);
        let target = MemorySink::new();
        to(target.clone());
        kid.info(&["moved".to_log_value()]);
        assert!(target.contents().contains(r#""kid" "moved""#));

        mute();
        kid.info(&["silent".to_log_value()]);
        assert!(!target.contents().contains("silent"));
    }

    #[inline(never)]
    fn traced_through_facade() {
        info(&["via facade".to_log_value()]);
        std::hint::black_box(());
    }

    #[test]
    fn facade_trace_names_caller() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let mem = MemorySink::new();
        install(Logger::new(mem.clone()));
        set_trace(0, 1, 0);
        traced_through_facade();
        clear_trace();
        let out = mem.contents();
        assert!(out.contains("traced_through_facade \"via facade\""), "{out}");
    }
}
