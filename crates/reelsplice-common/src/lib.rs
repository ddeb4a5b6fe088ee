//! Reelsplice-Common: Shared types, time codecs, and utilities.
//!
//! This crate provides functionality used across reelsplice:
//!
//! - **Time codecs**: whole-second timecodes plus SRT and ASS timestamps
//! - **Core types**: interval ids, labels, intervals and clips
//! - **Path utilities**: file classification by extension
//! - **Error handling**: the workspace-wide error type and result alias
//!
//! # Examples
//!
//! ```
//! use reelsplice_common::{Interval, IntervalId, Label, Timecode};
//! use reelsplice_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let interval = Interval::new(
//!     IntervalId::new(1),
//!     Label::Song,
//!     "00:01:00".parse::<Timecode>().unwrap(),
//!     Timecode::from_secs(90),
//! );
//! assert_eq!(interval.duration_secs(), 30);
//! assert!(is_video_file(Path::new("movie.mkv")));
//! ```

pub mod error;
pub mod paths;
pub mod timecode;
pub mod types;

pub use error::{Error, Result};
pub use timecode::{AssTime, SrtTime, Timecode};
pub use types::*;
