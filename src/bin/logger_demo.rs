use quill::bridge::Bridge;
use quill::settings::*;
use quill::{KV, Lbl, Loggable, global};

fn main() -> anyhow::Result<()> {
    // $ cargo run --bin logger_demo -- --debug --log-file=demo.log
    let cli = Cli::parse();
    let mut settings = parse_settings(cli.settings.as_deref())?;
    settings.apply_cli(&cli);

    global::install(settings.build()?);
    let _bridge = Bridge::install(settings.bridge_filter.as_deref().unwrap_or("info"))?;

    let log = global::logger();
    quill::info!(log, "this is a test");
    quill::info!(log, quill::line());
    tracing::info!("hello from tracing");
    quill::debug!(log, "only shown with --debug");

    global::error(None::<&str>);
    global::error(Some(anyhow::anyhow!("just an error")));

    let request = quill::child!(log, "request", KV::new("id", 7));
    quill::info!(request, "handled", KV::new("ms", 12.5));

    a();

    let mut traced = request.child(&[]);
    traced.set_trace(0, 3, 1);
    quill::info!(traced, Lbl::new("three frames:"));

    global::info(&["done".to_log_value()]);
    global::close()?;
    Ok(())
}

#[inline(never)]
fn a() {
    b();
    std::hint::black_box(());
}

#[inline(never)]
fn b() {
    c();
    std::hint::black_box(());
}

#[inline(never)]
fn c() {
    let log = global::logger();
    quill::info!(log, Lbl::new("Trace -->"), quill::line());
    quill::info!(log, Lbl::new("One line up"), quill::call_line(1));
    quill::trace::set_path_depth(1);
    quill::info!(log, Lbl::new("With parent dir"), quill::line());
    quill::trace::set_path_depth(quill::trace::DEFAULT_PATH_DEPTH);
    quill::info!(log, Lbl::new("Whole stack"), quill::trace_depth(0, -1, 0));
}
