//! Shared test doubles for integration tests.
//!
//! [`FakeProber`], [`FakeCutter`] and [`RecordingConcat`] stand in for
//! ffprobe and ffmpeg so the pipeline can run without external tools.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reelsplice_av::{ConcatStrategy, Cutter, MediaProber, StreamProfile, Workspace};
use reelsplice_common::{Error, Result, Timecode};

pub fn profile(codec: &str, width: u32, height: u32) -> StreamProfile {
    StreamProfile {
        codec: codec.to_string(),
        width,
        height,
    }
}

/// Prober returning a fixed duration and a per-file profile.
pub struct FakeProber {
    duration: Duration,
    default_profile: StreamProfile,
    overrides: Mutex<HashMap<PathBuf, StreamProfile>>,
}

impl FakeProber {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            default_profile: profile("h264", 1920, 1080),
            overrides: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_profile(self, path: &Path, profile: StreamProfile) -> Self {
        self.overrides
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), profile);
        self
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn video_profile(&self, path: &Path) -> Result<StreamProfile> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let overrides = self.overrides.lock().unwrap();
        Ok(overrides
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_profile.clone()))
    }

    async fn duration(&self, _path: &Path) -> Result<Duration> {
        Ok(self.duration)
    }
}

/// Cutter that writes the span into the output file and can be told to
/// fail for given start times. Tracks peak concurrency.
#[derive(Default)]
pub struct FakeCutter {
    fail_at: HashSet<u64>,
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeCutter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, start_secs: u64) -> Self {
        self.fail_at.insert(start_secs);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Cutter for FakeCutter {
    async fn cut(&self, _source: &Path, start: Timecode, end: Timecode, output: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = if self.fail_at.contains(&start.as_secs()) {
            Err(Error::tool("ffmpeg", format!("exit status 1 at {start}")))
        } else {
            std::fs::write(output, format!("{start}-{end}")).map_err(Error::from)
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Concat strategy that writes the input contents, in order, into the
/// workspace output and remembers what it was given.
pub struct RecordingConcat {
    uniform: bool,
    pub inputs: Mutex<Vec<PathBuf>>,
}

impl RecordingConcat {
    pub fn stream_copy() -> Arc<Self> {
        Arc::new(Self {
            uniform: true,
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn reencode() -> Arc<Self> {
        Arc::new(Self {
            uniform: false,
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn recorded(&self) -> Vec<PathBuf> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConcatStrategy for RecordingConcat {
    fn name(&self) -> &'static str {
        if self.uniform {
            "recording_copy"
        } else {
            "recording_reencode"
        }
    }

    fn requires_uniform_streams(&self) -> bool {
        self.uniform
    }

    async fn concat(&self, inputs: &[PathBuf], workspace: &Workspace) -> Result<()> {
        *self.inputs.lock().unwrap() = inputs.to_vec();
        let mut joined = Vec::new();
        for input in inputs {
            joined.extend(std::fs::read(input)?);
            joined.push(b'\n');
        }
        std::fs::write(workspace.output(), joined)?;
        Ok(())
    }
}

/// Write `records` as a manifest JSON array.
pub fn write_manifest(path: &Path, records: &[(u32, &str, f64, f64)]) {
    let array: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, label, start, end)| {
            serde_json::json!({"id": id, "label": label, "start": start, "end": end})
        })
        .collect();
    std::fs::write(path, serde_json::to_string_pretty(&array).unwrap()).unwrap();
}
