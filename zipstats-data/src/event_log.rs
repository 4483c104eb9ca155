//! Append-only audit trail of user-visible events.
//!
//! Every entry is one line: the current Unix time in milliseconds, a space,
//! then the event text. The sink is flushed after each entry so the trail
//! survives an abrupt exit.

use std::fmt;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8Path;

/// Writes timestamped events to a sink.
///
/// The log is an explicit value passed to whoever needs it rather than a
/// process-wide singleton, so tests can capture it.
pub struct EventLog {
    sink: Box<dyn Write + Send>,
}

impl EventLog {
    /// Log to an arbitrary writer.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Log to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Log to `path`, creating it (and its parent directories) if needed and
    /// appending to any existing content.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the file.
    pub fn append_to(path: &Utf8Path) -> io::Result<Self> {
        zipstats_fs::open_append(path).map(Self::new)
    }

    /// Record one event.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while writing or flushing.
    pub fn record(&mut self, event: impl fmt::Display) -> io::Result<()> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        writeln!(self.sink, "{millis} {event}")?;
        self.sink.flush()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::{Arc, Mutex};

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn split_entry(line: &str) -> (u128, &str) {
        let (millis, event) = line.split_once(' ').expect("timestamp separator");
        (millis.parse().expect("numeric timestamp"), event)
    }

    #[rstest]
    fn prefixes_events_with_millisecond_timestamps() {
        let buffer = SharedBuffer::default();
        let mut log = EventLog::new(buffer.clone());
        log.record("covid.csv").expect("write succeeds");
        log.record(3).expect("write succeeds");

        let bytes = buffer.0.lock().expect("buffer lock").clone();
        let text = String::from_utf8(bytes).expect("utf-8 log");
        let entries: Vec<_> = text.lines().map(split_entry).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, "covid.csv");
        assert_eq!(entries[1].1, "3");
        assert!(entries[0].0 > 1_600_000_000_000);
        assert!(entries[0].0 <= entries[1].0);
    }

    #[rstest]
    fn appends_across_sessions() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("logs/events.log"))
            .expect("utf-8 temp path");

        EventLog::append_to(&path)
            .expect("open log")
            .record("first")
            .expect("write succeeds");
        EventLog::append_to(&path)
            .expect("reopen log")
            .record("second")
            .expect("write succeeds");

        let text = fs::read_to_string(&path).expect("read log");
        let events: Vec<_> = text.lines().map(|line| split_entry(line).1).collect();
        assert_eq!(events, ["first", "second"]);
    }
}
