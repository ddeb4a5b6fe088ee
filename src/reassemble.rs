//! Ordering clips and joining them into one file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reelsplice_av::{ConcatStrategy, FormatValidator, Workspace};
use reelsplice_common::{Clip, Error, Interval, Result, Timecode};

/// Clips in reassembly order: `(interval_id, start)` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    clips: Vec<Clip>,
}

impl MergePlan {
    pub fn new(mut clips: Vec<Clip>) -> Self {
        clips.sort_by_key(|c| (c.interval_id, c.start));
        Self { clips }
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Spans covered by the plan, in plan order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.clips.iter().map(Clip::interval).collect()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.clips.iter().map(|c| c.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Walk the plan in join order and check each clip starts where the
    /// previous one ended, beginning at zero. Returns where the last clip
    /// ends.
    pub fn verify_contiguous(&self) -> Result<Timecode> {
        let mut cursor = Timecode::ZERO;
        for clip in &self.clips {
            if clip.start != cursor {
                let problem = if clip.start < cursor { "overlaps" } else { "leaves a gap" };
                return Err(Error::Coverage(format!(
                    "{} [{} - {}) {problem}: the join expects a clip starting at {cursor}",
                    clip.path.display(),
                    clip.start,
                    clip.end,
                )));
            }
            cursor = clip.end;
        }
        Ok(cursor)
    }

    /// Check that the plan, in join order, tiles `[0, total)`.
    pub fn verify_coverage(&self, total: Timecode) -> Result<()> {
        let end = self.verify_contiguous()?;
        if end != total {
            return Err(Error::Coverage(format!(
                "clips end at {end} but the source runs to {total}"
            )));
        }
        Ok(())
    }
}

/// Joins a [`MergePlan`] into one output file.
#[derive(Clone)]
pub struct SegmentReassembler {
    validator: FormatValidator,
    strategy: Arc<dyn ConcatStrategy>,
}

impl SegmentReassembler {
    pub fn new(validator: FormatValidator, strategy: Arc<dyn ConcatStrategy>) -> Self {
        Self {
            validator,
            strategy,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Order `clips` and join them into `output`.
    pub async fn merge(&self, clips: Vec<Clip>, output: &Path) -> Result<PathBuf> {
        self.merge_plan(&MergePlan::new(clips), output).await
    }

    /// Join an already ordered plan into `output`, replacing any existing
    /// file only once the join succeeded.
    ///
    /// The plan must be contiguous in join order. A strategy that requires
    /// uniform streams gets its inputs validated first; a mismatch aborts
    /// the merge and nothing is written.
    pub async fn merge_plan(&self, plan: &MergePlan, output: &Path) -> Result<PathBuf> {
        if plan.is_empty() {
            return Err(Error::invalid_input("nothing to merge: the clip list is empty"));
        }
        plan.verify_contiguous()?;

        let paths = plan.paths();
        if self.strategy.requires_uniform_streams() {
            self.validator.validate_uniform(&paths).await?;
        } else if let Some(missing) = paths.iter().find(|p| !p.exists()) {
            return Err(Error::NotFound(missing.clone()));
        }

        tracing::info!(
            clips = plan.len(),
            strategy = self.strategy.name(),
            output = %output.display(),
            "merging clips"
        );

        let workspace = Workspace::for_output(output)?;
        self.strategy.concat(&paths, &workspace).await?;
        let merged = workspace.finalize()?;

        tracing::info!(output = %merged.display(), "merge complete");
        Ok(merged)
    }
}
