//! Benchmarks for timeline work
//!
//! Complement derivation over long manifests and subtitle synchronization
//! over dense cue lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reelsplice::partition::{derive_complement, full_partition, verify_tiling};
use reelsplice::subtitle::{parse_srt, render_ass, StyleTable, SubtitleCue, TimelineSynchronizer};
use reelsplice_common::{Interval, IntervalId, Label, SrtTime, Timecode};

/// Songs of 90s every 300s.
fn songs(count: u32) -> Vec<Interval> {
    (0..count)
        .map(|i| {
            let start = u64::from(i) * 300 + 60;
            Interval::new(
                IntervalId::new(i + 1),
                Label::Song,
                Timecode::from_secs(start),
                Timecode::from_secs(start + 90),
            )
        })
        .collect()
}

/// Two-second cues with a gap after every third and an overlap after every
/// seventh.
fn cues(count: usize) -> Vec<SubtitleCue> {
    let mut out = Vec::with_capacity(count);
    let mut start = 1_000u64;
    for i in 0..count {
        let end = start + 2_000;
        out.push(SubtitleCue::new(
            i + 1,
            SrtTime::from_millis(start),
            SrtTime::from_millis(end),
            format!("line {i}"),
        ));
        start = if i % 7 == 6 {
            end - 500
        } else if i % 3 == 2 {
            end + 750
        } else {
            end
        };
    }
    out
}

fn srt_text(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .map(|c| format!("{}\n{} --> {}\n{}\n", c.index, c.start, c.end, c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");

    for count in [10u32, 100, 1_000] {
        let labeled = songs(count);
        let total = Timecode::from_secs(u64::from(count) * 300 + 60);

        group.bench_with_input(
            BenchmarkId::new("derive_complement", count),
            &labeled,
            |b, labeled| b.iter(|| derive_complement(black_box(labeled), black_box(total))),
        );

        let derived = derive_complement(&labeled, total).unwrap();
        let all = full_partition(&labeled, &derived);
        group.bench_with_input(BenchmarkId::new("verify_tiling", count), &all, |b, all| {
            b.iter(|| verify_tiling(black_box(all), black_box(total)))
        });
    }

    group.finish();
}

fn bench_subtitles(c: &mut Criterion) {
    let styles = StyleTable::builtin();
    let sync = TimelineSynchronizer::new(&styles);
    let mut group = c.benchmark_group("subtitles");

    for count in [50usize, 500, 5_000] {
        let list = cues(count);
        let text = srt_text(&list);

        group.bench_with_input(BenchmarkId::new("parse_srt", count), &text, |b, text| {
            b.iter(|| parse_srt(black_box(text)))
        });

        group.bench_with_input(BenchmarkId::new("synchronize", count), &list, |b, list| {
            b.iter(|| sync.synchronize(black_box(list), "hi"))
        });

        let timeline = sync.synchronize(&list, "hi").unwrap();
        group.bench_with_input(BenchmarkId::new("render_ass", count), &timeline, |b, tl| {
            b.iter(|| render_ass(black_box(tl)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partition, bench_subtitles);
criterion_main!(benches);
