//! Loading the three sources into a region store.
//!
//! Sources are merged in a fixed order (observations, population, then
//! properties) into one [`RegionStoreBuilder`]. Invalid rows are counted and
//! skipped; malformed files, missing header columns, and I/O failures abort
//! the load.

use std::fmt;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use thiserror::Error;
use zipstats_core::{
    ObservationRecord, PopulationRecord, PropertyRecord, RegionStore, RegionStoreBuilder,
};

use crate::event_log::EventLog;
use crate::format::SourceFormat;
use crate::json::{self, JsonDocumentError};
use crate::source::{ByteSource, CharacterSource};
use crate::tokenizer::{RowTokenizer, TokenizeError};
use crate::validate::{
    MissingColumn, ObservationValidator, PopulationValidator, PropertyValidator, RecordValidator,
};


/// The three input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Timestamped health observations.
    Observations,
    /// Population counts.
    Population,
    /// Property assessments.
    Properties,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Observations => "observation",
            Self::Population => "population",
            Self::Properties => "property",
        })
    }
}

/// Failures reading a single source stream.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The delimited text is malformed or could not be read.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// The source is empty, so it has no header row.
    #[error("source has no header row")]
    MissingHeader,
    /// A required column is absent from the header.
    #[error(transparent)]
    MissingColumn(#[from] MissingColumn),
    /// The JSON document is malformed or has the wrong shape.
    #[error(transparent)]
    Json(#[from] JsonDocumentError),
    /// Reading the raw bytes failed.
    #[error("failed to read source")]
    Read(#[from] io::Error),
}

/// Errors raised while loading sources from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened.
    #[error("failed to open {kind} source at {path}")]
    Open {
        /// Which source was being opened.
        kind: SourceKind,
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file extension does not name a format the source supports.
    #[error("{kind} source {path} is not in a supported format")]
    UnsupportedFormat {
        /// Which source was rejected.
        kind: SourceKind,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The source content could not be loaded.
    #[error("failed to load {kind} source {path}")]
    Source {
        /// Which source failed.
        kind: SourceKind,
        /// Path of the failing source.
        path: Utf8PathBuf,
        /// What went wrong.
        #[source]
        source: SourceError,
    },
    /// The event log could not be written.
    #[error("failed to record load event")]
    EventLog {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Row counts for one loaded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Which source the counts describe.
    pub kind: SourceKind,
    /// Data rows read, excluding the header.
    pub rows_read: usize,
    /// Rows merged into the store.
    pub rows_accepted: usize,
    /// Rows discarded by validation.
    pub rows_rejected: usize,
}

impl LoadSummary {
    const fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            rows_read: 0,
            rows_accepted: 0,
            rows_rejected: 0,
        }
    }
}

/// Paths of the sources to load. Each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSources {
    /// Observation source, `.csv` or `.json`.
    pub observations: Option<Utf8PathBuf>,
    /// Population source, `.csv`.
    pub population: Option<Utf8PathBuf>,
    /// Property source, `.csv`.
    pub properties: Option<Utf8PathBuf>,
}

/// Which sources contributed to a loaded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCoverage {
    /// Observations were loaded.
    pub observations: bool,
    /// Population counts were loaded.
    pub population: bool,
    /// Property assessments were loaded.
    pub properties: bool,
}

impl SourceCoverage {
    /// Report whether `kind` was loaded.
    #[must_use]
    pub const fn contains(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Observations => self.observations,
            SourceKind::Population => self.population,
            SourceKind::Properties => self.properties,
        }
    }

    const fn insert(&mut self, kind: SourceKind) {
        match kind {
            SourceKind::Observations => self.observations = true,
            SourceKind::Population => self.population = true,
            SourceKind::Properties => self.properties = true,
        }
    }
}

/// The frozen store together with what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    /// Reconciled regions.
    pub store: RegionStore,
    /// Sources that were supplied.
    pub coverage: SourceCoverage,
    /// Per-source row counts, in load order.
    pub summaries: Vec<LoadSummary>,
}

/// Applies a validated record to the store.
trait MergeRecord {
    fn merge_into(self, builder: &mut RegionStoreBuilder);
}

impl MergeRecord for ObservationRecord {
    fn merge_into(self, builder: &mut RegionStoreBuilder) {
        let region = self.region;
        if builder.merge_observation(self) {
            debug!("observation for {region} replaced an earlier row with the same timestamp");
        }
    }
}

impl MergeRecord for PopulationRecord {
    fn merge_into(self, builder: &mut RegionStoreBuilder) {
        builder.merge_population(self);
    }
}

impl MergeRecord for PropertyRecord {
    fn merge_into(self, builder: &mut RegionStoreBuilder) {
        builder.merge_property(&self);
    }
}

struct RowMerger<'store, V> {
    validator: V,
    builder: &'store mut RegionStoreBuilder,
    summary: LoadSummary,
}

impl<'store, V> RowMerger<'store, V>
where
    V: RecordValidator,
    V::Record: MergeRecord,
{
    fn new(
        kind: SourceKind,
        header: &[String],
        builder: &'store mut RegionStoreBuilder,
    ) -> Result<Self, MissingColumn> {
        Ok(Self {
            validator: V::from_header(header)?,
            builder,
            summary: LoadSummary::new(kind),
        })
    }

    fn accept(&mut self, row: &[String]) {
        self.summary.rows_read += 1;
        match self.validator.validate(row) {
            Ok(record) => {
                record.merge_into(self.builder);
                self.summary.rows_accepted += 1;
            }
            Err(rejection) => {
                debug!(
                    "skipping {} row {}: {rejection}",
                    self.summary.kind, self.summary.rows_read
                );
                self.summary.rows_rejected += 1;
            }
        }
    }
}

fn merge_delimited<V, S>(
    kind: SourceKind,
    source: S,
    builder: &mut RegionStoreBuilder,
) -> Result<LoadSummary, SourceError>
where
    V: RecordValidator,
    V::Record: MergeRecord,
    S: CharacterSource,
{
    let mut tokenizer = RowTokenizer::new(source);
    let header = tokenizer.next_row()?.ok_or(SourceError::MissingHeader)?;
    let mut merger = RowMerger::<V>::new(kind, &header, builder)?;
    while let Some(row) = tokenizer.next_row()? {
        merger.accept(&row);
    }
    Ok(merger.summary)
}

/// Merge observations from a reader in the given format.
///
/// # Errors
///
/// Returns [`SourceError`] for malformed input or a missing required column.
pub fn load_observations<R: Read>(
    mut reader: R,
    format: SourceFormat,
    builder: &mut RegionStoreBuilder,
) -> Result<LoadSummary, SourceError> {
    match format {
        SourceFormat::DelimitedText => merge_delimited::<ObservationValidator, _>(
            SourceKind::Observations,
            ByteSource::new(reader),
            builder,
        ),
        SourceFormat::StructuredDocument => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            let extracted = json::observation_rows(&mut bytes)?;
            let mut merger = RowMerger::<ObservationValidator>::new(
                SourceKind::Observations,
                &json::json_header(),
                builder,
            )?;
            for row in &extracted.rows {
                merger.accept(row);
            }
            if extracted.skipped > 0 {
                warn!(
                    "skipped {} observation entries that were not objects",
                    extracted.skipped
                );
                merger.summary.rows_read += extracted.skipped;
                merger.summary.rows_rejected += extracted.skipped;
            }
            Ok(merger.summary)
        }
    }
}

/// Merge population counts from delimited text.
///
/// # Errors
///
/// Returns [`SourceError`] for malformed input or a missing required column.
pub fn load_population<R: Read>(
    reader: R,
    builder: &mut RegionStoreBuilder,
) -> Result<LoadSummary, SourceError> {
    merge_delimited::<PopulationValidator, _>(
        SourceKind::Population,
        ByteSource::new(reader),
        builder,
    )
}

/// Merge property assessments from delimited text.
///
/// # Errors
///
/// Returns [`SourceError`] for malformed input or a missing required column.
pub fn load_properties<R: Read>(
    reader: R,
    builder: &mut RegionStoreBuilder,
) -> Result<LoadSummary, SourceError> {
    merge_delimited::<PropertyValidator, _>(
        SourceKind::Properties,
        ByteSource::new(reader),
        builder,
    )
}

/// Open `path` and merge it as the given source.
///
/// Observations may be `.csv` or `.json`; the other sources must be `.csv`.
///
/// # Errors
///
/// Returns [`LoadError`] when the format is unsupported, the file cannot be
/// opened, or its content cannot be loaded.
pub fn load_source(
    kind: SourceKind,
    path: &Utf8Path,
    builder: &mut RegionStoreBuilder,
) -> Result<LoadSummary, LoadError> {
    let format = SourceFormat::from_path(path)
        .filter(|format| {
            kind == SourceKind::Observations || *format == SourceFormat::DelimitedText
        })
        .ok_or_else(|| LoadError::UnsupportedFormat {
            kind,
            path: path.to_path_buf(),
        })?;
    let file = zipstats_fs::open_utf8_file(path).map_err(|source| LoadError::Open {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = match kind {
        SourceKind::Observations => load_observations(file, format, builder),
        SourceKind::Population => load_population(file, builder),
        SourceKind::Properties => load_properties(file, builder),
    };
    let summary = loaded.map_err(|source| LoadError::Source {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "loaded {kind} source {path}: {} of {} rows accepted",
        summary.rows_accepted, summary.rows_read
    );
    Ok(summary)
}

/// Load every supplied source and freeze the result.
///
/// Each opened path is recorded in `log` before it is read.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered; nothing is returned for the
/// sources that loaded before it.
pub fn load_dataset(
    sources: &DatasetSources,
    log: &mut EventLog,
) -> Result<LoadedDataset, LoadError> {
    let mut builder = RegionStoreBuilder::new();
    let mut coverage = SourceCoverage::default();
    let mut summaries = Vec::new();
    let ordered = [
        (SourceKind::Observations, sources.observations.as_deref()),
        (SourceKind::Population, sources.population.as_deref()),
        (SourceKind::Properties, sources.properties.as_deref()),
    ];
    for (kind, path) in ordered {
        let Some(path) = path else { continue };
        log.record(path)
            .map_err(|source| LoadError::EventLog { source })?;
        summaries.push(load_source(kind, path, &mut builder)?);
        coverage.insert(kind);
    }
    Ok(LoadedDataset {
        store: builder.finish(),
        coverage,
        summaries,
    })
}
