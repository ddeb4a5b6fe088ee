//! Pre-merge format validation.

use std::path::PathBuf;
use std::sync::Arc;

use reelsplice_common::{Error, Result};

use crate::probe::{MediaProber, StreamProfile};

/// Blocks a lossless merge when its inputs do not share one stream profile.
#[derive(Clone)]
pub struct FormatValidator {
    prober: Arc<dyn MediaProber>,
}

impl FormatValidator {
    pub fn new(prober: Arc<dyn MediaProber>) -> Self {
        Self { prober }
    }

    /// Check that every path has the same codec and frame size as the first.
    ///
    /// Paths are probed in order and the first mismatch is reported with
    /// both profiles. Empty and single-element sets pass without probing
    /// beyond existence.
    pub async fn validate_uniform(&self, paths: &[PathBuf]) -> Result<Option<StreamProfile>> {
        if let Some(missing) = paths.iter().find(|p| !p.exists()) {
            return Err(Error::NotFound(missing.clone()));
        }

        let Some((first, rest)) = paths.split_first() else {
            return Ok(None);
        };

        let baseline = self.prober.video_profile(first).await?;
        tracing::debug!(path = %first.display(), profile = %baseline, "baseline stream profile");

        for path in rest {
            let profile = self.prober.video_profile(path).await?;
            if profile != baseline {
                return Err(Error::FormatMismatch {
                    path: path.clone(),
                    expected: baseline.to_string(),
                    found: profile.to_string(),
                });
            }
        }

        tracing::info!(clips = paths.len(), profile = %baseline, "all clips share one stream profile");
        Ok(Some(baseline))
    }
}
