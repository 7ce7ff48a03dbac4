use quill::{Lbl, Loggable, Logger, MemorySink, trace_depth};
use std::hint::black_box;

#[inline(never)]
fn reports_itself() -> Option<Lbl> {
    black_box(trace_depth(0, 1, 0))
}

#[inline(never)]
fn logs_with_trace(log: &Logger) {
    log.info(&["x".to_log_value()]);
    black_box(());
}

#[inline(never)]
fn logs_through_macro(log: &Logger) {
    quill::info!(log, "y");
    black_box(());
}

#[test]
fn level_zero_is_the_calling_function() {
    let frame = reports_itself().expect("frame");
    assert!(frame.as_str().starts_with("frames.rs:"), "{frame}");
    assert!(frame.as_str().ends_with("frames::reports_itself"), "{frame}");
}

#[test]
fn info_trace_names_the_logging_function() {
    let mem = MemorySink::new();
    let mut log = Logger::new(mem.clone());
    log.set_trace(0, 1, 0);

    logs_with_trace(&log);
    logs_through_macro(&log);

    let lines = mem.lines();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].contains(r#" INFO frames.rs:"#), "{}", lines[0]);
    assert!(lines[0].ends_with(r#"frames::logs_with_trace "x""#), "{}", lines[0]);
    assert!(lines[1].ends_with(r#"frames::logs_through_macro "y""#), "{}", lines[1]);
}

#[test]
fn one_level_up_is_the_callers_caller() {
    let mem = MemorySink::new();
    let mut log = Logger::new(mem.clone());
    log.set_trace(1, 1, 0);
    called_from_outer(&log);
    assert!(
        mem.contents().contains(r#"frames::called_from_outer "x""#),
        "{}",
        mem.contents()
    );
}

#[inline(never)]
fn called_from_outer(log: &Logger) {
    logs_with_trace(log);
    black_box(());
}
