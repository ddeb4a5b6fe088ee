//! CLI end-to-end tests
//!
//! Tests for the reelsplice command-line interface. Only commands that do
//! not need ffmpeg are exercised beyond their help output.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the reelsplice binary
#[allow(deprecated)]
fn reelsplice_cmd() -> Command {
    Command::cargo_bin("reelsplice").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = reelsplice_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_lists_commands() {
    let mut cmd = reelsplice_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reelsplice"))
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("subtitles"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = reelsplice_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "reelsplice {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = reelsplice_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_merge_help() {
    let mut cmd = reelsplice_cmd();
    cmd.args(["merge", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reencode"))
        .stdout(predicate::str::contains("--check-coverage"))
        .stdout(predicate::str::contains("--suffix"));
}

#[test]
fn test_cli_init_creates_project() {
    let dir = tempdir().unwrap();
    let movie = dir.path().join("rishtey.mp4");
    fs::write(&movie, b"movie").unwrap();
    fs::write(
        dir.path().join("rishtey.json"),
        r#"[{"id": 1, "label": "song", "start": 0, "end": 10}]"#,
    )
    .unwrap();

    let mut cmd = reelsplice_cmd();
    cmd.current_dir(dir.path())
        .args(["init", movie.to_str().unwrap(), "--languages", "kn,ta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project ready"));

    let root = dir.path().join("rishtey");
    assert!(root.join("Input/rishtey.mp4").is_file());
    assert!(root.join("Input/rishtey.json").is_file());
    assert!(root.join("Input/BaseLanguage/songs/song_files").is_dir());
    assert!(root.join("Output/ta/songs/subtitle_files").is_dir());
}

#[test]
fn test_cli_init_missing_movie_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = reelsplice_cmd();
    cmd.current_dir(dir.path())
        .args(["init", dir.path().join("gone.mp4").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone.mp4"));
}

#[test]
fn test_cli_split_missing_project_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = reelsplice_cmd();
    cmd.current_dir(dir.path())
        .args(["split", dir.path().join("nothing").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open project"));
}

#[test]
fn test_cli_subtitles_converts_srt() {
    let dir = tempdir().unwrap();
    let srt = dir.path().join("song.srt");
    fs::write(
        &srt,
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n",
    )
    .unwrap();

    let mut cmd = reelsplice_cmd();
    cmd.current_dir(dir.path())
        .args(["subtitles", srt.to_str().unwrap(), "--language", "Tamil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 cues, 3 events"));

    let ass = fs::read_to_string(dir.path().join("song.ass")).unwrap();
    assert!(ass.contains("Style: Default,Noto Sans Tamil,30,&H00FFFF00"));
    assert_eq!(ass.lines().filter(|l| l.starts_with("Dialogue:")).count(), 3);
}

#[test]
fn test_cli_subtitles_unknown_language_fails() {
    let dir = tempdir().unwrap();
    let srt = dir.path().join("song.srt");
    fs::write(&srt, "1\n00:00:01,000 --> 00:00:02,000\nHello\n").unwrap();

    let mut cmd = reelsplice_cmd();
    cmd.current_dir(dir.path())
        .args(["subtitles", srt.to_str().unwrap(), "-l", "xx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No subtitle style"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("reelsplice.toml");
    fs::write(&config, "[extraction]\nmax_workers = 4\n").unwrap();

    let mut cmd = reelsplice_cmd();
    cmd.args(["validate", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("4 workers"));
}

#[test]
fn test_cli_validate_rejects_zero_workers() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("reelsplice.toml");
    fs::write(&config, "[extraction]\nmax_workers = 0\n").unwrap();

    let mut cmd = reelsplice_cmd();
    cmd.args(["validate", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_workers"));
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = reelsplice_cmd();
    cmd.args(["probe", "/nonexistent/file.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
