//! Core type definitions for labeled intervals and extracted clips.
//!
//! Labels serialize in lowercase to match the manifest format.

use crate::timecode::Timecode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Identity of an interval, shared by a labeled span and the clip cut from it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IntervalId(u32);

impl IntervalId {
    /// Create an id from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parse a textual id.
    ///
    /// Leading and trailing whitespace is ignored; anything other than a
    /// non-negative integer that fits in `u32` is a [`Error::SegmentId`].
    ///
    /// ```
    /// use reelsplice_common::IntervalId;
    ///
    /// assert_eq!(IntervalId::parse("007").unwrap(), IntervalId::new(7));
    /// assert!(IntervalId::parse("a1").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::SegmentId(raw.to_string()));
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| Error::SegmentId(raw.to_string()))
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IntervalId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Classification of a span of the source media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Musical content.
    Song,
    /// Spoken story content.
    Voice,
}

impl Label {
    /// The other label. Derived gap intervals carry the complement of the
    /// labeled set they were computed from.
    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::Song => Self::Voice,
            Self::Voice => Self::Song,
        }
    }

    /// Lowercase name as written in manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Voice => "voice",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "song" => Ok(Self::Song),
            "voice" => Ok(Self::Voice),
            other => Err(Error::invalid_input(format!(
                "unknown label '{other}', expected 'song' or 'voice'"
            ))),
        }
    }
}

/// A labeled span `[start, end)` of the source media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub id: IntervalId,
    pub label: Label,
    pub start: Timecode,
    pub end: Timecode,
}

impl Interval {
    #[must_use]
    pub fn new(id: IntervalId, label: Label, start: Timecode, end: Timecode) -> Self {
        Self {
            id,
            label,
            start,
            end,
        }
    }

    /// Length of the span in whole seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        self.end.saturating_since(self.start)
    }

    /// Whether two spans share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:03} {} [{} - {})",
            self.id.get(),
            self.label,
            self.start,
            self.end
        )
    }
}

/// A physical media file cut from one interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clip {
    pub interval_id: IntervalId,
    pub label: Label,
    pub start: Timecode,
    pub end: Timecode,
    pub path: PathBuf,
}

impl Clip {
    /// Create a clip for `interval` stored at `path`.
    #[must_use]
    pub fn from_interval(interval: &Interval, path: impl Into<PathBuf>) -> Self {
        Self {
            interval_id: interval.id,
            label: interval.label,
            start: interval.start,
            end: interval.end,
            path: path.into(),
        }
    }

    /// The span this clip was cut from.
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval::new(self.interval_id, self.label, self.start, self.end)
    }
}
