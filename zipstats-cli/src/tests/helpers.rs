//! Test helpers for driving sessions and writing dataset files.

use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use camino::Utf8PathBuf;
use tempfile::TempDir;
use zipstats_core::test_support::sample_store;
use zipstats_data::{EventLog, SourceCoverage};
use zipstats_metrics::MetricsEngine;

use crate::session::Session;

/// Event log sink that tests can read back after the session ends.
#[derive(Clone, Default)]
pub(super) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(super) fn contents(&self) -> String {
        let bytes = self
            .0
            .lock()
            .unwrap_or_else(|err| panic!("buffer poisoned: {err}"))
            .clone();
        String::from_utf8(bytes).expect("event log is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|err| panic!("buffer poisoned: {err}"))
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Everything a finished session wrote.
pub(super) struct Transcript {
    pub(super) output: String,
    pub(super) complaints: String,
    pub(super) events: String,
}

impl Transcript {
    /// Lines between each `BEGIN OUTPUT` / `END OUTPUT` pair.
    pub(super) fn blocks(&self) -> Vec<Vec<&str>> {
        output_blocks(&self.output)
    }
}

pub(super) fn output_blocks(output: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    for line in output.lines() {
        match line {
            "BEGIN OUTPUT" => current = Some(Vec::new()),
            "END OUTPUT" => blocks.extend(current.take()),
            other => {
                if let Some(block) = current.as_mut() {
                    block.push(other);
                }
            }
        }
    }
    blocks
}

pub(super) const FULL_COVERAGE: SourceCoverage = SourceCoverage {
    observations: true,
    population: true,
    properties: true,
};

/// Run a session over the sample store with the given typed input.
pub(super) fn run_session(coverage: SourceCoverage, input: &str) -> Transcript {
    let events = SharedBuffer::default();
    let mut event_log = EventLog::new(events.clone());
    let mut output = Vec::new();
    let mut complaints = Vec::new();
    Session::new(
        MetricsEngine::new(sample_store()),
        coverage,
        &mut event_log,
        input.as_bytes(),
        &mut output,
        &mut complaints,
    )
    .run()
    .expect("session completes");
    Transcript {
        output: String::from_utf8(output).expect("output is UTF-8"),
        complaints: String::from_utf8(complaints).expect("complaints are UTF-8"),
        events: events.contents(),
    }
}

/// Temporary directory holding dataset files for one test.
pub(super) struct DatasetDir {
    dir: TempDir,
}

impl DatasetDir {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name))
            .unwrap_or_else(|path| panic!("non-UTF-8 temp path {path:?}"))
    }

    pub(super) fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap_or_else(|err| panic!("write {path}: {err}"));
        path
    }

    pub(super) fn mkdir(&self, name: &str) -> Utf8PathBuf {
        let path = self.path(name);
        fs::create_dir(&path).unwrap_or_else(|err| panic!("mkdir {path}: {err}"));
        path
    }
}

pub(super) const OBSERVATIONS_CSV: &str = "\
zip_code,etl_timestamp,partially_vaccinated,fully_vaccinated
19104,2021-05-28 17:20:02,100,50
19108,2021-05-28 17:20:02,30,20
";

pub(super) const POPULATION_CSV: &str = "\
zip_code,population
19104,1000
19108,500
";

pub(super) const PROPERTIES_CSV: &str = "\
market_value,total_livable_area,zip_code
200000,500,19104-1234
300000,500,19104
";
