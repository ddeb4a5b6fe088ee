//! Media probing.
//!
//! [`MediaProber`] is the seam between the pipeline and ffprobe: the
//! validator and the split pipeline depend on the trait, and tests swap in
//! in-memory doubles.

pub mod ffprobe;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reelsplice_common::Result;
use serde::{Deserialize, Serialize};

pub use self::ffprobe::FfprobeProber;

/// Codec and frame size of the first video stream.
///
/// Two clips can be concatenated without re-encoding only when their
/// profiles are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamProfile {
    pub codec: String,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for StreamProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.codec, self.width, self.height)
    }
}

/// Interface for reading stream facts from a media file.
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Human-readable name of this backend.
    fn name(&self) -> &'static str;

    /// Profile of the first video stream.
    async fn video_profile(&self, path: &Path) -> Result<StreamProfile>;

    /// Container duration.
    async fn duration(&self, path: &Path) -> Result<Duration>;
}
