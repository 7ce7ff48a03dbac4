use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An output destination for log lines.
pub struct Sink {
    writer: Box<dyn Write + Send>,
    closable: bool,
}

impl Sink {
    /// A sink whose handle outlives `close`, e.g. stdout or a shared buffer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            closable: false,
        }
    }

    /// A sink that is flushed and released by `close`, e.g. an owned file.
    pub fn closable(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            closable: true,
        }
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }
}

impl<W: Write + Send + 'static> From<W> for Sink {
    fn from(writer: W) -> Self {
        Sink::new(writer)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("closable", &self.closable)
            .finish_non_exhaustive()
    }
}

/// A sink plus the lock serializing every write and rebind on it.
///
/// Loggers hold the cell through an `Arc`; rebinding the sink is seen by
/// every logger holding the same cell.
#[derive(Debug, Default)]
pub struct WriterCell {
    sink: Mutex<Option<Sink>>,
}

impl WriterCell {
    pub fn new(sink: Option<Sink>) -> Arc<Self> {
        Arc::new(Self {
            sink: Mutex::new(sink),
        })
    }

    // A panic while writing must not silence the family for good.
    fn lock(&self) -> MutexGuard<'_, Option<Sink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_sink(&self, sink: Option<Sink>) {
        let previous = std::mem::replace(&mut *self.lock(), sink);
        drop(previous);
    }

    pub fn is_muted(&self) -> bool {
        self.lock().is_none()
    }

    /// Writes `bytes` in one piece. A muted cell accepts and discards them.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self.lock();
        match guard.as_mut() {
            Some(sink) => {
                sink.writer.write_all(bytes)?;
                sink.writer.flush()
            }
            None => Ok(()),
        }
    }

    /// Flushes the sink and, when it is closable, releases it so later writes
    /// become no-ops. Calling it again is harmless.
    pub fn close(&self) -> io::Result<()> {
        let mut guard = self.lock();
        let Some(sink) = guard.as_mut() else {
            return Ok(());
        };
        let flushed = sink.writer.flush();
        if sink.closable {
            *guard = None;
        }
        flushed
    }
}

/// An in-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_reach_the_sink() {
        let mem = MemorySink::new();
        let cell = WriterCell::new(Some(mem.clone().into()));
        cell.write(b"one\n").unwrap();
        cell.write(b"two\n").unwrap();
        assert_eq!(mem.lines(), vec!["one", "two"]);
    }

    #[test]
    fn muted_cell_reports_success() {
        let cell = WriterCell::new(None);
        assert!(cell.is_muted());
        assert!(cell.write(b"dropped\n").is_ok());
    }

    #[test]
    fn rebinding_switches_destination() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let cell = WriterCell::new(Some(first.clone().into()));
        cell.write(b"a\n").unwrap();
        cell.set_sink(Some(second.clone().into()));
        cell.write(b"b\n").unwrap();
        assert_eq!(first.contents(), "a\n");
        assert_eq!(second.contents(), "b\n");

        cell.set_sink(None);
        cell.write(b"c\n").unwrap();
        assert_eq!(second.contents(), "b\n");
    }

    #[test]
    fn write_errors_surface_from_cell() {
        let cell = WriterCell::new(Some(Sink::new(Failing)));
        assert!(cell.write(b"x").is_err());
    }

    #[test]
    fn close_releases_closable_sink_only() {
        let kept = MemorySink::new();
        let cell = WriterCell::new(Some(kept.clone().into()));
        cell.close().unwrap();
        assert!(!cell.is_muted());

        let owned = MemorySink::new();
        let cell = WriterCell::new(Some(Sink::closable(owned.clone())));
        cell.write(b"before\n").unwrap();
        cell.close().unwrap();
        cell.close().unwrap();
        assert!(cell.is_muted());
        cell.write(b"after\n").unwrap();
        assert_eq!(owned.contents(), "before\n");
    }
}
