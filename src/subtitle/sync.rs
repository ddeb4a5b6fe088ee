//! Building a gap-free ASS event timeline from SRT cues.

use reelsplice_common::{AssTime, Error, Result};
use serde::Serialize;

use super::languages::{StyleTable, SubtitleStyle};
use super::srt::SubtitleCue;

/// Override tag that renders an event fully transparent.
pub const FILLER_TEXT: &str = r"{\alpha&HFF&}";

/// Whether an event carries subtitle text or only fills a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Cue,
    Filler,
}

/// One `Dialogue:` line of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub start: AssTime,
    pub end: AssTime,
    /// ASS-escaped text; lines are joined with `\N`.
    pub text: String,
    pub kind: EventKind,
}

impl TimelineEvent {
    fn filler(start: AssTime, end: AssTime) -> Self {
        Self {
            start,
            end,
            text: FILLER_TEXT.to_string(),
            kind: EventKind::Filler,
        }
    }
}

/// Styled events for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub language: String,
    pub style: SubtitleStyle,
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Start of the first event and end of the last.
    pub fn span(&self) -> Option<(AssTime, AssTime)> {
        Some((self.events.first()?.start, self.events.last()?.end))
    }

    pub fn cue_count(&self) -> usize {
        self.events.iter().filter(|e| e.kind == EventKind::Cue).count()
    }
}

/// Converts cue lists into timelines using per-language styles.
#[derive(Debug, Clone)]
pub struct TimelineSynchronizer<'a> {
    styles: &'a StyleTable,
    leading_filler: bool,
}

impl<'a> TimelineSynchronizer<'a> {
    pub fn new(styles: &'a StyleTable) -> Self {
        Self {
            styles,
            leading_filler: false,
        }
    }

    /// Also fill `[0, first cue)` so the timeline starts at zero.
    pub fn with_leading_filler(mut self, enabled: bool) -> Self {
        self.leading_filler = enabled;
        self
    }

    /// Build the timeline for `cues` in `language`.
    ///
    /// Cues must be ordered by start time. Between consecutive cues a
    /// transparent filler event covers any gap. A cue that starts before the
    /// previous event ends cuts that event short, dropping it when nothing
    /// is left, so events never overlap.
    pub fn synchronize(&self, cues: &[SubtitleCue], language: &str) -> Result<Timeline> {
        let style = self
            .styles
            .get(language)
            .cloned()
            .ok_or_else(|| Error::StyleConfig(language.to_string()))?;

        let mut events: Vec<TimelineEvent> = Vec::with_capacity(cues.len() * 2);
        let mut previous: Option<(usize, AssTime)> = None;

        for cue in cues {
            let start = cue.start.to_ass();
            let end = cue.end.to_ass();

            if let Some((prev_index, prev_start)) = previous {
                if start < prev_start {
                    return Err(Error::subtitle_order(format!(
                        "cue {} starts at {start}, before cue {prev_index} at {prev_start}",
                        cue.index
                    )));
                }
            }

            if end <= start {
                tracing::debug!(cue = cue.index, "skipping cue shorter than a centisecond");
                continue;
            }

            match events.last_mut() {
                Some(last) if start < last.end => {
                    tracing::debug!(cue = cue.index, "trimming overlapping event");
                    last.end = start;
                    if last.end <= last.start {
                        events.pop();
                    }
                }
                Some(last) if start > last.end => {
                    let gap_start = last.end;
                    events.push(TimelineEvent::filler(gap_start, start));
                }
                Some(_) => {}
                None if self.leading_filler && start > AssTime::default() => {
                    events.push(TimelineEvent::filler(AssTime::default(), start));
                }
                None => {}
            }

            events.push(TimelineEvent {
                start,
                end,
                text: escape_ass_text(&cue.text),
                kind: EventKind::Cue,
            });
            previous = Some((cue.index, start));
        }

        tracing::debug!(
            language,
            cues = cues.len(),
            events = events.len(),
            "subtitle timeline synchronized"
        );

        Ok(Timeline {
            language: language.to_string(),
            style,
            events,
        })
    }
}

/// Join text lines with the ASS hard line break.
fn escape_ass_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(r"\N")
}
