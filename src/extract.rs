//! Bounded parallel extraction of one clip per interval.
//!
//! Clip files are named `<base>_<id:03>_<start>_<end>[_<suffix>].<ext>`
//! with `HH-MM-SS` timestamps, so a later run can rebuild [`Clip`]s from a
//! directory listing with [`discover_clips`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reelsplice_av::Cutter;
use reelsplice_common::paths::{is_video_file, media_base_name, media_extension};
use reelsplice_common::{Clip, Error, Interval, IntervalId, Label, Result, Timecode};
use tokio::sync::{mpsc, Semaphore};
use walkdir::WalkDir;

use crate::config::ExtractionConfig;

/// One interval that could not be cut.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub interval: Interval,
    pub error: Error,
}

/// Outcome of one [`SegmentExtractor::extract`] call.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Successful clips in input order.
    pub clips: Vec<Clip>,
    pub failures: Vec<ExtractionFailure>,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: ExtractionReport) {
        self.clips.extend(other.clips);
        self.failures.extend(other.failures);
    }
}

/// Cuts intervals out of a source file on a bounded worker pool.
#[derive(Clone)]
pub struct SegmentExtractor {
    cutter: Arc<dyn Cutter>,
    max_workers: usize,
}

impl SegmentExtractor {
    pub fn new(cutter: Arc<dyn Cutter>, config: &ExtractionConfig) -> Self {
        Self {
            cutter,
            max_workers: config.max_workers.max(1),
        }
    }

    /// Cut every interval of `source` into `output_dir`.
    ///
    /// At most `max_workers` cuts run at once. A failed cut is logged and
    /// recorded in the report without stopping the others. The call returns
    /// only after every cut has finished, so the report is complete.
    pub async fn extract(
        &self,
        source: &Path,
        intervals: &[Interval],
        output_dir: &Path,
        suffix: Option<&str>,
    ) -> Result<ExtractionReport> {
        if !source.exists() {
            return Err(Error::NotFound(source.to_path_buf()));
        }
        std::fs::create_dir_all(output_dir)?;

        let base = media_base_name(source);
        let ext = media_extension(source);
        let source = Arc::new(source.to_path_buf());
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let (tx, mut rx) = mpsc::channel::<(usize, Result<Clip>)>(intervals.len().max(1));

        tracing::info!(
            source = %source.display(),
            intervals = intervals.len(),
            workers = self.max_workers,
            output_dir = %output_dir.display(),
            "extracting clips"
        );

        for (position, interval) in intervals.iter().copied().enumerate() {
            let out_path = output_dir.join(clip_file_name(&base, &interval, suffix, &ext));
            let cutter = Arc::clone(&self.cutter);
            let source = Arc::clone(&source);
            let permits = Arc::clone(&permits);
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => cutter
                        .cut(&source, interval.start, interval.end, &out_path)
                        .await
                        .map(|()| Clip::from_interval(&interval, out_path)),
                    Err(e) => Err(Error::tool("extract", format!("worker pool closed: {e}"))),
                };
                // The receiver outlives every sender.
                let _ = tx.send((position, result)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Result<Clip>>> = intervals.iter().map(|_| None).collect();
        while let Some((position, result)) = rx.recv().await {
            slots[position] = Some(result);
        }

        let mut report = ExtractionReport::default();
        for (interval, slot) in intervals.iter().zip(slots) {
            let outcome = slot.unwrap_or_else(|| {
                Err(Error::tool("extract", "worker task ended without a result"))
            });
            match outcome {
                Ok(clip) => {
                    tracing::debug!(clip = %clip.path.display(), "clip extracted");
                    report.clips.push(clip);
                }
                Err(error) => {
                    tracing::warn!(interval = %interval, error = %error, "clip extraction failed");
                    report.failures.push(ExtractionFailure {
                        interval: *interval,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            extracted = report.clips.len(),
            failed = report.failures.len(),
            "extraction finished"
        );
        Ok(report)
    }
}

/// `<base>_<id:03>_<start>_<end>[_<suffix>].<ext>`
pub fn clip_file_name(base: &str, interval: &Interval, suffix: Option<&str>, ext: &str) -> String {
    let mut name = format!(
        "{base}_{:03}_{}_{}",
        interval.id.get(),
        interval.start.to_file_component(),
        interval.end.to_file_component()
    );
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        name.push('_');
        name.push_str(suffix);
    }
    name.push('.');
    name.push_str(ext);
    name
}

/// Fields recovered from a clip file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipName {
    pub base: String,
    pub id: IntervalId,
    pub start: Timecode,
    pub end: Timecode,
    pub suffix: Option<String>,
    pub ext: String,
}

/// Invert [`clip_file_name`]. Returns `None` for names that do not follow
/// the scheme.
pub fn parse_clip_file_name(file_name: &str) -> Option<ClipName> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let parts: Vec<&str> = stem.split('_').collect();

    parse_parts(&parts, None, ext).or_else(|| {
        let (suffix, rest) = parts.split_last()?;
        parse_parts(rest, Some(suffix), ext)
    })
}

fn parse_parts(parts: &[&str], suffix: Option<&str>, ext: &str) -> Option<ClipName> {
    if parts.len() < 4 {
        return None;
    }
    let n = parts.len();
    let end = Timecode::from_file_component(parts[n - 1]).ok()?;
    let start = Timecode::from_file_component(parts[n - 2]).ok()?;
    let id = IntervalId::parse(parts[n - 3]).ok()?;
    let base = parts[..n - 3].join("_");
    if base.is_empty() || end <= start {
        return None;
    }
    Some(ClipName {
        base,
        id,
        start,
        end,
        suffix: suffix.map(str::to_string),
        ext: ext.to_string(),
    })
}

/// Rebuild clips from the video files in `dir`, ordered by `(id, start)`.
///
/// Files whose names do not follow the clip scheme are ignored. With a
/// `suffix`, only clips carrying exactly that suffix are kept.
pub fn discover_clips(dir: &Path, label: Label, suffix: Option<&str>) -> Result<Vec<Clip>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let mut clips = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_video_file(path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match parse_clip_file_name(name) {
            Some(parsed) if suffix.is_some() && parsed.suffix.as_deref() != suffix => {
                tracing::debug!(file = %path.display(), "skipping clip from another split");
            }
            Some(parsed) => clips.push(Clip {
                interval_id: parsed.id,
                label,
                start: parsed.start,
                end: parsed.end,
                path: path.to_path_buf(),
            }),
            None => tracing::debug!(file = %path.display(), "ignoring file outside the clip naming scheme"),
        }
    }

    clips.sort_by_key(|c| (c.interval_id, c.start));
    Ok(clips)
}

/// Paths of `clips`, in order.
pub fn clip_paths(clips: &[Clip]) -> Vec<PathBuf> {
    clips.iter().map(|c| c.path.clone()).collect()
}
