//! Manifest and partition integration tests
//!
//! Load manifests from disk and check that labeled plus derived intervals
//! always tile the timeline.

mod common;

use assert_matches::assert_matches;
use common::write_manifest;
use reelsplice::manifest::Manifest;
use reelsplice::partition::{derive_complement, full_partition, merge_order, verify_tiling};
use reelsplice_common::{Error, IntervalId, Label, Timecode};
use tempfile::tempdir;

fn load(records: &[(u32, &str, f64, f64)]) -> Manifest {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunks.json");
    write_manifest(&path, records);
    Manifest::load(&path).unwrap()
}

#[test]
fn test_songs_and_derived_story_tile_the_movie() {
    let layouts: &[&[(u32, &str, f64, f64)]] = &[
        &[],
        &[(1, "song", 0.0, 30.0)],
        &[(1, "song", 0.0, 600.0)],
        &[(4, "song", 590.0, 600.0)],
        &[(1, "song", 61.5, 125.9), (2, "song", 125.9, 200.0)],
        &[(3, "song", 300.0, 360.0), (1, "song", 10.0, 20.0), (2, "song", 100.0, 180.0)],
    ];
    let total = Timecode::from_secs(600);

    for records in layouts {
        let manifest = load(records);
        let songs = manifest.extract_by_label(Label::Song);
        let story = derive_complement(&songs, total).unwrap();

        assert!(story.iter().all(|i| i.label == Label::Voice));
        assert!(story.iter().all(|i| i.start < i.end));
        verify_tiling(&full_partition(&songs, &story), total)
            .unwrap_or_else(|e| panic!("{records:?}: {e}"));
    }
}

#[test]
fn test_fractional_times_are_floored() {
    let manifest = load(&[(1, "song", 61.9, 125.2)]);
    let song = manifest.intervals()[0];
    assert_eq!(song.start, Timecode::from_secs(61));
    assert_eq!(song.end, Timecode::from_secs(125));
    assert_eq!(song.to_string(), "#001 song [00:01:01 - 00:02:05)");
}

#[test]
fn test_gap_ids_follow_next_song() {
    let manifest = load(&[(7, "song", 10.0, 20.0), (9, "song", 30.0, 40.0)]);
    let story = derive_complement(manifest.intervals(), Timecode::from_secs(50)).unwrap();

    let ids: Vec<u32> = story.iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![7, 9, 9]);

    let order = merge_order(&full_partition(manifest.intervals(), &story));
    let starts: Vec<u64> = order.iter().map(|(_, start)| start.as_secs()).collect();
    assert_eq!(starts, vec![0, 10, 20, 30, 40]);
    assert_eq!(order[0].0, IntervalId::new(7));
}

#[test]
fn test_overlapping_songs_are_rejected() {
    let manifest = load(&[(1, "song", 0.0, 20.0), (2, "song", 19.0, 30.0)]);
    let err = derive_complement(manifest.intervals(), Timecode::from_secs(60)).unwrap_err();
    assert_matches!(err, Error::UnsortedOrOverlapping(_));
}

#[test]
fn test_song_past_duration_is_rejected() {
    let manifest = load(&[(1, "song", 50.0, 70.0)]);
    let err = derive_complement(manifest.intervals(), Timecode::from_secs(60)).unwrap_err();
    assert_matches!(err, Error::UnsortedOrOverlapping(_));
}

#[test]
fn test_non_numeric_id_fails_at_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunks.json");
    std::fs::write(
        &path,
        r#"[{"id": "intro", "label": "song", "start": 0, "end": 10}]"#,
    )
    .unwrap();

    assert_matches!(Manifest::load(&path), Err(Error::SegmentId(id)) if id.contains("intro"));
}

#[test]
fn test_chunk_counts() {
    let manifest = load(&[
        (1, "song", 0.0, 10.0),
        (2, "voice", 10.0, 20.0),
        (3, "song", 20.0, 30.0),
    ]);
    let counts = manifest.chunk_counts();
    assert_eq!((counts.song, counts.voice), (2, 1));
    assert_eq!(manifest.extract_by_label(Label::Voice).len(), 1);
}
