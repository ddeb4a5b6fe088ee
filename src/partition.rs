//! Deriving the complement of a labeled interval set and checking that a
//! set of intervals tiles the whole timeline.

use reelsplice_common::{Error, Interval, IntervalId, Label, Result, Timecode};

/// Compute the gaps between `labeled` intervals over `[0, total)`.
///
/// Labeled intervals are ordered by `(start, id)` first; overlap or an end
/// past `total` is rejected. Each gap takes the complementary label and the
/// id of the labeled interval that follows it. The trailing gap takes the id
/// of the last labeled interval; with nothing labeled the whole timeline is
/// one gap with id 0. Zero-length gaps are not emitted.
///
/// ```
/// use reelsplice::partition::derive_complement;
/// use reelsplice_common::{Interval, IntervalId, Label, Timecode};
///
/// let songs = [Interval::new(
///     IntervalId::new(1),
///     Label::Song,
///     Timecode::from_secs(10),
///     Timecode::from_secs(20),
/// )];
/// let story = derive_complement(&songs, Timecode::from_secs(30)).unwrap();
/// assert_eq!(story.len(), 2);
/// assert_eq!(story[0].label, Label::Voice);
/// assert_eq!(story[1].start, Timecode::from_secs(20));
/// ```
pub fn derive_complement(labeled: &[Interval], total: Timecode) -> Result<Vec<Interval>> {
    let mut sorted: Vec<Interval> = labeled.to_vec();
    sorted.sort_by_key(|i| (i.start, i.id));

    check_sorted_disjoint(&sorted, total)?;

    let complement_label = sorted
        .first()
        .map(|i| i.label.complement())
        .unwrap_or(Label::Voice);

    let mut derived = Vec::with_capacity(sorted.len() + 1);
    let mut previous_end = Timecode::ZERO;

    for interval in &sorted {
        if interval.start != previous_end {
            derived.push(Interval::new(
                interval.id,
                complement_label,
                previous_end,
                interval.start,
            ));
        }
        previous_end = interval.end;
    }

    if previous_end < total {
        let id = sorted.last().map(|i| i.id).unwrap_or_default();
        derived.push(Interval::new(id, complement_label, previous_end, total));
    }

    tracing::debug!(
        labeled = sorted.len(),
        derived = derived.len(),
        total = %total,
        "derived complement intervals"
    );
    Ok(derived)
}

fn check_sorted_disjoint(sorted: &[Interval], total: Timecode) -> Result<()> {
    if let Some(first_label) = sorted.first().map(|i| i.label) {
        if let Some(other) = sorted.iter().find(|i| i.label != first_label) {
            return Err(Error::invalid_input(format!(
                "cannot derive a complement from mixed labels ({first_label} and {})",
                other.label
            )));
        }
    }

    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(Error::UnsortedOrOverlapping(format!(
                "{} overlaps {}",
                pair[1], pair[0]
            )));
        }
    }

    if let Some(past_end) = sorted.iter().find(|i| i.end > total) {
        return Err(Error::UnsortedOrOverlapping(format!(
            "{past_end} extends past the media duration {total}"
        )));
    }

    Ok(())
}

/// Verify that `intervals` tile `[0, total)` with no gap and no overlap.
///
/// Intervals are checked in start order regardless of input order.
pub fn verify_tiling(intervals: &[Interval], total: Timecode) -> Result<()> {
    let mut sorted: Vec<&Interval> = intervals.iter().collect();
    sorted.sort_by_key(|i| (i.start, i.id));

    let mut cursor = Timecode::ZERO;
    for interval in sorted {
        if interval.start > cursor {
            return Err(Error::Coverage(format!(
                "gap from {cursor} to {} before {interval}",
                interval.start
            )));
        }
        if interval.start < cursor {
            return Err(Error::Coverage(format!(
                "{interval} overlaps coverage ending at {cursor}"
            )));
        }
        cursor = interval.end;
    }

    if cursor != total {
        return Err(Error::Coverage(format!(
            "coverage ends at {cursor}, expected {total}"
        )));
    }
    Ok(())
}

/// Labeled and derived intervals merged into one `(start, id)`-ordered list.
pub fn full_partition(labeled: &[Interval], derived: &[Interval]) -> Vec<Interval> {
    let mut all: Vec<Interval> = labeled.iter().chain(derived).copied().collect();
    all.sort_by_key(|i| (i.start, i.id));
    all
}

/// Ids in `(id, start)` order, the order reassembly uses.
pub fn merge_order(intervals: &[Interval]) -> Vec<(IntervalId, Timecode)> {
    let mut keys: Vec<(IntervalId, Timecode)> = intervals.iter().map(|i| (i.id, i.start)).collect();
    keys.sort();
    keys
}
