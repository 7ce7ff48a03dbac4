use quill::bridge::Bridge;
use quill::{Logger, MemorySink, global};

// The bridge is a process-wide subscriber, so this binary holds a single test.
#[test]
fn tracing_events_land_in_default_logger() {
    let mem = MemorySink::new();
    global::install(Logger::new(mem.clone()));

    let bridge = Bridge::install("info").unwrap();
    tracing::info!(answer = 42, "from tracing");
    tracing::debug!("filtered out");

    bridge.reload("debug").unwrap();
    tracing::debug!("now visible");

    global::mute();
    tracing::info!("muted");

    let lines = mem.lines();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].contains(" TRACING INFO bridge: from tracing answer=42"), "{}", lines[0]);
    assert!(lines[1].contains(" TRACING DEBUG bridge: now visible"), "{}", lines[1]);

    assert!(Bridge::install("info").is_err());
}
