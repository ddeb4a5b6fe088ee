//! SubRip parsing.

use reelsplice_common::{Error, Result, SrtTime};

/// One SubRip block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub index: usize,
    pub start: SrtTime,
    pub end: SrtTime,
    /// Text lines joined with `\n`.
    pub text: String,
}

impl SubtitleCue {
    pub fn new(index: usize, start: SrtTime, end: SrtTime, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }
}

/// Parse SRT content into cues, in file order.
///
/// Blocks are separated by blank lines. A block needs an index line, a
/// `start --> end` line and at least one text line; shorter blocks and
/// blocks without `-->` are skipped with a warning. A timing line that does
/// not parse is an error carrying the 1-based line number.
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleCue>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut cues = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !block.is_empty() {
                if let Some(cue) = parse_block(&block, cues.len() + 1)? {
                    cues.push(cue);
                }
                block.clear();
            }
        } else {
            block.push((i + 1, line));
        }
    }
    if !block.is_empty() {
        if let Some(cue) = parse_block(&block, cues.len() + 1)? {
            cues.push(cue);
        }
    }

    Ok(cues)
}

fn parse_block(block: &[(usize, &str)], fallback_index: usize) -> Result<Option<SubtitleCue>> {
    let first_line = block[0].0;

    if block.len() < 3 {
        tracing::warn!(line = first_line, "skipping subtitle block with fewer than 3 lines");
        return Ok(None);
    }

    let (timing_line, timing) = block[1];
    let Some((raw_start, raw_end)) = timing.split_once("-->") else {
        tracing::warn!(line = timing_line, "skipping subtitle block without a timing line");
        return Ok(None);
    };

    let start: SrtTime = raw_start
        .trim()
        .parse()
        .map_err(|e: Error| Error::subtitle(timing_line, e.to_string()))?;
    // Some writers append position hints after the end time.
    let end: SrtTime = raw_end
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse()
        .map_err(|e: Error| Error::subtitle(timing_line, e.to_string()))?;

    if end < start {
        return Err(Error::subtitle(
            timing_line,
            format!("cue ends ({end}) before it starts ({start})"),
        ));
    }

    let index = block[0].1.trim().parse().unwrap_or(fallback_index);
    let text = block[2..]
        .iter()
        .map(|(_, l)| l.trim())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Some(SubtitleCue::new(index, start, end, text)))
}
