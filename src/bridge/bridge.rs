use crate::error::LogError;
use crate::global;
use crate::logger::Logger;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

pub const BRIDGE_FLAG: &str = "TRACING";

/// Collects one formatted event and writes it to the process logger as a
/// single line when dropped.
pub struct BridgeWriter {
    logger: Arc<Logger>,
    buf: Vec<u8>,
}

impl BridgeWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            buf: Vec::new(),
        }
    }

    fn emit(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let Some(cell) = self.logger.cell() else {
            self.buf.clear();
            return Ok(());
        };

        let event = String::from_utf8_lossy(&self.buf);
        let mut line = self.logger.format().timestamp();
        line.push(' ');
        line.push_str(BRIDGE_FLAG);
        line.push(' ');
        line.push_str(event.trim_start());
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.buf.clear();
        cell.write(line.as_bytes())
    }
}

impl Write for BridgeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for BridgeWriter {
    fn drop(&mut self) {
        let _ = self.emit();
    }
}

/// Hands out a [`BridgeWriter`] bound to whichever process logger is
/// installed when the event is formatted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeMakeWriter;

impl<'a> MakeWriter<'a> for BridgeMakeWriter {
    type Writer = BridgeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BridgeWriter::new(global::logger())
    }
}

/// A fmt layer writing into the process logger. The logger adds its own
/// timestamp, so the layer prints level, target and fields only.
pub fn bridge_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_target(true)
        .with_writer(BridgeMakeWriter)
}

/// The installed bridge; keeps the filter reloadable.
pub struct Bridge {
    reload_handle: reload::Handle<EnvFilter, Registry>,
}

impl Bridge {
    /// Installs the bridge as the global `tracing` subscriber.
    pub fn install(filter: &str) -> Result<Self, LogError> {
        let filter = EnvFilter::try_new(filter).map_err(|e| LogError::Bridge(e.to_string()))?;
        let (filter, reload_handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(bridge_layer())
            .try_init()
            .map_err(|e| LogError::Bridge(e.to_string()))?;

        Ok(Self { reload_handle })
    }

    pub fn reload(&self, filter: &str) -> Result<(), LogError> {
        let filter = EnvFilter::try_new(filter).map_err(|e| LogError::Bridge(e.to_string()))?;
        self.reload_handle
            .reload(filter)
            .map_err(|e| LogError::Bridge(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::MemorySink;

    #[test]
    fn writer_emits_one_line_on_drop() {
        let mem = MemorySink::new();
        let logger = Arc::new(Logger::new(mem.clone()));
        {
            let mut writer = BridgeWriter::new(logger);
            writer.write_all(b" INFO app: ").unwrap();
            writer.write_all(b"hello\n").unwrap();
            assert!(mem.is_empty());
        }
        let lines = mem.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" TRACING INFO app: hello"), "{}", lines[0]);
    }

    #[test]
    fn writer_on_absent_logger_discards() {
        let mut writer = BridgeWriter::new(Arc::new(Logger::absent()));
        writer.write_all(b"ignored\n").unwrap();
        drop(writer);
    }
}
