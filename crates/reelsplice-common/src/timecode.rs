//! Time codecs shared by the clip pipeline and the subtitle pipeline.
//!
//! Three representations are used:
//!
//! - [`Timecode`]: whole seconds, rendered `HH:MM:SS`. Manifest times are
//!   floored to this precision and clip file names embed it.
//! - [`SrtTime`]: milliseconds, rendered `HH:MM:SS,mmm`.
//! - [`AssTime`]: centiseconds, rendered `H:MM:SS.cc`.
//!
//! Conversion from SRT to ASS truncates milliseconds to centiseconds; it
//! never rounds.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A whole-second position on a media timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode(u64);

impl Timecode {
    /// The start of the timeline.
    pub const ZERO: Timecode = Timecode(0);

    /// Create a timecode from whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create a timecode from fractional seconds, flooring to whole seconds.
    ///
    /// Negative and non-finite inputs clamp to zero.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self(secs.floor() as u64)
        } else {
            Self(0)
        }
    }

    /// Whole seconds since the start of the timeline.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Seconds as a float, for passing to external tools.
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[must_use]
    pub fn saturating_since(self, earlier: Timecode) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Render for embedding in a file name (`HH-MM-SS`).
    #[must_use]
    pub fn to_file_component(self) -> String {
        self.to_string().replace(':', "-")
    }

    /// Parse the `HH-MM-SS` form produced by [`Timecode::to_file_component`].
    pub fn from_file_component(s: &str) -> Result<Self> {
        s.replace('-', ":").parse()
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl FromStr for Timecode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_input(format!("invalid timestamp '{s}', expected HH:MM:SS"));

        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let hours: u64 = parse_field(h).ok_or_else(invalid)?;
        let minutes: u64 = parse_field(m).ok_or_else(invalid)?;
        let seconds: u64 = parse_field(sec).ok_or_else(invalid)?;
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .map(Self)
            .ok_or_else(|| Error::invalid_input(format!("timestamp '{s}' is out of range")))
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timecode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Convert fractional seconds to `HH:MM:SS`, flooring to whole seconds.
#[must_use]
pub fn seconds_to_timestamp(seconds: f64) -> String {
    Timecode::from_secs_f64(seconds).to_string()
}

/// Convert `HH:MM:SS` to seconds.
pub fn timestamp_to_seconds(timestamp: &str) -> Result<f64> {
    timestamp.parse::<Timecode>().map(Timecode::as_secs_f64)
}

/// A SubRip timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SrtTime {
    millis: u64,
}

impl SrtTime {
    /// Create from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Milliseconds since the start of the timeline.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.millis
    }

    /// Convert to ASS precision, truncating to centiseconds.
    #[must_use]
    pub const fn to_ass(self) -> AssTime {
        AssTime::from_centis(self.millis / 10)
    }
}

impl fmt::Display for SrtTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.millis / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            total_secs / 3600,
            (total_secs % 3600) / 60,
            total_secs % 60,
            self.millis % 1000
        )
    }
}

impl FromStr for SrtTime {
    type Err = Error;

    /// Parse `HH:MM:SS,mmm`. A `.` separator and a missing fractional part
    /// are accepted; one or two fractional digits are read as a decimal
    /// fraction (`,5` is 500 ms).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::invalid_input(format!("invalid SRT timestamp '{s}'"));

        let (clock, fraction) = match s.rfind([',', '.']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let whole: Timecode = clock.parse().map_err(|_| invalid())?;
        let millis = match fraction {
            Some(digits) => parse_fraction(digits, 3).ok_or_else(invalid)?,
            None => 0,
        };

        let millis = whole
            .as_secs()
            .checked_mul(1000)
            .and_then(|ms| ms.checked_add(millis))
            .ok_or_else(invalid)?;
        Ok(Self { millis })
    }
}

/// An Advanced SubStation Alpha timestamp with centisecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssTime {
    centis: u64,
}

impl AssTime {
    /// Create from centiseconds.
    #[must_use]
    pub const fn from_centis(centis: u64) -> Self {
        Self { centis }
    }

    /// Centiseconds since the start of the timeline.
    #[must_use]
    pub const fn as_centis(self) -> u64 {
        self.centis
    }

    /// Convert back to SRT precision. Exact for every `AssTime`.
    #[must_use]
    pub const fn to_srt(self) -> SrtTime {
        SrtTime::from_millis(self.centis * 10)
    }
}

impl fmt::Display for AssTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.centis / 100;
        write!(
            f,
            "{}:{:02}:{:02}.{:02}",
            total_secs / 3600,
            (total_secs % 3600) / 60,
            total_secs % 60,
            self.centis % 100
        )
    }
}

impl Serialize for AssTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for AssTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::invalid_input(format!("invalid ASS timestamp '{s}'"));

        let (clock, fraction) = s.split_once('.').ok_or_else(invalid)?;
        let whole: Timecode = clock.parse().map_err(|_| invalid())?;
        let centis = parse_fraction(fraction, 2).ok_or_else(invalid)?;

        Ok(Self {
            centis: whole.as_secs() * 100 + centis,
        })
    }
}

/// Convert an SRT timestamp string to ASS form.
///
/// # Examples
///
/// ```
/// use reelsplice_common::timecode::srt_timestamp_to_ass;
///
/// assert_eq!(srt_timestamp_to_ass("00:00:01,500").unwrap(), "0:00:01.50");
/// assert_eq!(srt_timestamp_to_ass("01:02:03,009").unwrap(), "1:02:03.00");
/// ```
pub fn srt_timestamp_to_ass(srt: &str) -> Result<String> {
    Ok(srt.parse::<SrtTime>()?.to_ass().to_string())
}

fn parse_field(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Read up to `width` decimal digits as a fraction scaled to `10^width`.
fn parse_fraction(digits: &str, width: usize) -> Option<u64> {
    if digits.is_empty() || digits.len() > width {
        return None;
    }
    let value = parse_field(digits)?;
    Some(value * 10u64.pow((width - digits.len()) as u32))
}
