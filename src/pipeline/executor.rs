use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use reelsplice_av::{Cutter, MediaProber};
use reelsplice_common::{Error, Interval, Label, Timecode};

use crate::config::ExtractionConfig;
use crate::extract::{discover_clips, ExtractionReport, SegmentExtractor};
use crate::manifest::Manifest;
use crate::partition::{derive_complement, full_partition, verify_tiling};
use crate::project::ProjectLayout;
use crate::reassemble::{MergePlan, SegmentReassembler};

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync>;

/// Destination folder for each label's clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipDirs {
    pub song: PathBuf,
    pub voice: PathBuf,
}

impl ClipDirs {
    pub fn new(song: impl Into<PathBuf>, voice: impl Into<PathBuf>) -> Self {
        Self {
            song: song.into(),
            voice: voice.into(),
        }
    }

    pub fn from_layout(layout: &ProjectLayout) -> Self {
        Self::new(layout.song_clips_dir(), layout.story_clips_dir())
    }

    pub fn for_label(&self, label: Label) -> &Path {
        match label {
            Label::Song => &self.song,
            Label::Voice => &self.voice,
        }
    }
}

/// Result of a split run.
#[derive(Debug)]
pub struct SplitOutcome {
    pub duration: Timecode,
    /// Intervals listed in the manifest under the configured label.
    pub labeled: Vec<Interval>,
    /// Gaps between them, carrying the other label.
    pub derived: Vec<Interval>,
    pub report: ExtractionReport,
}

/// Drives the split and merge flows over a prober and a cutter.
pub struct PipelineExecutor {
    prober: Arc<dyn MediaProber>,
    extractor: SegmentExtractor,
    label: Label,
    progress_callback: Option<ProgressCallback>,
}

impl PipelineExecutor {
    pub fn new(
        prober: Arc<dyn MediaProber>,
        cutter: Arc<dyn Cutter>,
        extraction: &ExtractionConfig,
    ) -> Self {
        Self {
            prober,
            extractor: SegmentExtractor::new(cutter, extraction),
            label: extraction.label,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report_progress(&self, progress: f32, step: &str) {
        if let Some(ref cb) = self.progress_callback {
            cb(progress, step);
        }
        tracing::info!("[{:.0}%] {}", progress, step);
    }

    /// Cut `source` into labeled clips and the derived gap clips.
    ///
    /// Manifest, probe and partition errors abort before anything is cut.
    /// Individual cut failures end up in the returned report.
    pub async fn split(
        &self,
        source: &Path,
        manifest_path: &Path,
        dirs: &ClipDirs,
        suffix: Option<&str>,
    ) -> Result<SplitOutcome> {
        if !source.exists() {
            return Err(Error::NotFound(source.to_path_buf()).into());
        }

        self.report_progress(0.0, "Loading manifest");
        let manifest = Manifest::load(manifest_path)
            .with_context(|| format!("Failed to load manifest: {:?}", manifest_path))?;
        let labeled = manifest.extract_by_label(self.label);
        if labeled.is_empty() {
            tracing::warn!(
                label = self.label.as_str(),
                "manifest lists no intervals for this label; the whole file becomes one clip"
            );
        }

        self.report_progress(10.0, "Probing duration");
        let duration = self
            .prober
            .duration(source)
            .await
            .with_context(|| format!("Failed to probe duration of {:?}", source))?;
        let total = Timecode::from_secs_f64(duration.as_secs_f64());

        self.report_progress(20.0, "Partitioning timeline");
        let derived = derive_complement(&labeled, total)?;
        verify_tiling(&full_partition(&labeled, &derived), total)?;
        tracing::info!(
            labeled = labeled.len(),
            derived = derived.len(),
            total = %total,
            "timeline partitioned"
        );

        let complement = self.label.complement();
        self.report_progress(30.0, &format!("Extracting {} clips", self.label.as_str()));
        let mut report = self
            .extractor
            .extract(source, &labeled, dirs.for_label(self.label), suffix)
            .await?;

        self.report_progress(65.0, &format!("Extracting {} clips", complement.as_str()));
        report.absorb(
            self.extractor
                .extract(source, &derived, dirs.for_label(complement), suffix)
                .await?,
        );

        self.report_progress(100.0, "Split complete");
        Ok(SplitOutcome {
            duration: total,
            labeled,
            derived,
            report,
        })
    }

    /// Collect the clips under `dirs` into one merge plan, keeping only those
    /// named with `suffix` when one is given. Missing folders are skipped.
    pub fn collect_clips(&self, dirs: &ClipDirs, suffix: Option<&str>) -> Result<MergePlan> {
        let mut clips = Vec::new();
        for label in [Label::Song, Label::Voice] {
            let dir = dirs.for_label(label);
            if !dir.is_dir() {
                tracing::warn!(dir = %dir.display(), "clip folder missing, skipping");
                continue;
            }
            clips.extend(discover_clips(dir, label, suffix)?);
        }
        Ok(MergePlan::new(clips))
    }

    /// Rejoin the clips under `dirs` into `output`.
    ///
    /// The plan must always run gap-free and overlap-free from zero. When
    /// `source` is given its duration is probed and the plan must also end
    /// exactly there.
    pub async fn merge(
        &self,
        reassembler: &SegmentReassembler,
        dirs: &ClipDirs,
        suffix: Option<&str>,
        output: &Path,
        source: Option<&Path>,
    ) -> Result<PathBuf> {
        self.report_progress(0.0, "Collecting clips");
        let plan = self.collect_clips(dirs, suffix)?;
        tracing::info!(clips = plan.len(), "merge plan ready");

        if let Some(source) = source {
            self.report_progress(20.0, "Checking coverage");
            let duration = self
                .prober
                .duration(source)
                .await
                .with_context(|| format!("Failed to probe duration of {:?}", source))?;
            plan.verify_coverage(Timecode::from_secs_f64(duration.as_secs_f64()))?;
        }

        self.report_progress(40.0, &format!("Merging with {}", reassembler.strategy_name()));
        let merged = reassembler
            .merge_plan(&plan, output)
            .await
            .with_context(|| format!("Failed to merge into {:?}", output))?;

        self.report_progress(100.0, "Merge complete");
        Ok(merged)
    }
}
