//! Labeled-chunk manifest loading.
//!
//! A manifest is a JSON array of records sitting beside the source media:
//!
//! ```json
//! [
//!   {"id": 1, "label": "song",  "start": 12.4,  "end": 95.0},
//!   {"id": "2", "label": "voice", "start": 95.0, "end": 300.2}
//! ]
//! ```
//!
//! Times are seconds and are floored to whole seconds on load. Ids may be
//! numbers or numeric strings.

use std::path::{Path, PathBuf};

use reelsplice_common::{Error, Interval, IntervalId, Label, Result, Timecode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: serde_json::Value,
    label: String,
    start: f64,
    end: f64,
}

/// Number of records carrying each label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkCounts {
    pub song: usize,
    pub voice: usize,
}

/// Ordered, immutable list of intervals read from one manifest file.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    intervals: Vec<Interval>,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::manifest(path, format!("failed to read: {e}")))?;
        Self::from_json_str(&content, path)
    }

    /// Parse manifest JSON. `origin` is used in error messages.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self> {
        let records: Vec<RawRecord> = serde_json::from_str(json)
            .map_err(|e| Error::manifest(origin, format!("expected an array of chunk records: {e}")))?;

        let intervals = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| convert_record(i, record, origin))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            path = %origin.display(),
            intervals = intervals.len(),
            "manifest loaded"
        );

        Ok(Self {
            path: origin.to_path_buf(),
            intervals,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All intervals in manifest order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals carrying `label`, in manifest order. Empty when none match.
    pub fn extract_by_label(&self, label: Label) -> Vec<Interval> {
        self.intervals
            .iter()
            .filter(|i| i.label == label)
            .copied()
            .collect()
    }

    pub fn chunk_counts(&self) -> ChunkCounts {
        self.intervals
            .iter()
            .fold(ChunkCounts::default(), |mut acc, i| {
                match i.label {
                    Label::Song => acc.song += 1,
                    Label::Voice => acc.voice += 1,
                }
                acc
            })
    }
}

fn convert_record(position: usize, record: RawRecord, origin: &Path) -> Result<Interval> {
    let id = parse_id(&record.id)?;

    let label: Label = record.label.parse().map_err(|_| {
        Error::manifest(
            origin,
            format!("record {position}: unknown label '{}'", record.label),
        )
    })?;

    let (start, end) = (record.start, record.end);
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 {
        return Err(Error::manifest(
            origin,
            format!("record {position} (id {id}): times must be finite and non-negative"),
        ));
    }
    if end <= start {
        return Err(Error::manifest(
            origin,
            format!("record {position} (id {id}): end {end} is not after start {start}"),
        ));
    }

    let start = Timecode::from_secs_f64(start);
    let end = Timecode::from_secs_f64(end);
    if end <= start {
        return Err(Error::manifest(
            origin,
            format!("record {position} (id {id}): span {start}-{end} is shorter than one second"),
        ));
    }

    Ok(Interval::new(id, label, start, end))
}

fn parse_id(value: &serde_json::Value) -> Result<IntervalId> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(IntervalId::new)
            .ok_or_else(|| Error::SegmentId(n.to_string())),
        serde_json::Value::String(s) => IntervalId::parse(s),
        other => Err(Error::SegmentId(other.to_string())),
    }
}
