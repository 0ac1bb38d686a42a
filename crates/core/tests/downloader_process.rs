//! End-to-end runs against shell scripts standing in for yt-dlp.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use tubemirror_core::{
    CommandRunner, Config, Orchestrator, PlaylistDescriptor, PlaylistOutcome,
};

const URL: &str = "https://www.youtube.com/playlist?list=PL59FEE129ADFF2B12";

fn write_stub(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("yt-dlp");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(root: &Path, binary: PathBuf) -> Config {
    let mut config = Config::with_root(root);
    config.downloader.binary = binary;
    config.policy.recovery_shortcuts = false;
    config
}

#[tokio::test]
async fn test_stub_downloader_end_to_end() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let args_file = bin.path().join("args.txt");

    let stub = write_stub(
        bin.path(),
        &format!(
            r#"printf '%s\n' "$@" > '{}'
echo '[youtube:tab] Downloading playlist'
echo '[download] Downloading item 1 of 2'
echo 'ERROR: [youtube] abc123: Video unavailable' 1>&2
echo '[download] Downloading item 2 of 2'
echo '[download] def456: has already been recorded in the archive'
exit 1"#,
            args_file.display()
        ),
    );

    let config = config_for(root.path(), stub);
    let orchestrator = Orchestrator::new(&config, CommandRunner::new());
    let playlists = vec![PlaylistDescriptor::new("Test", "audio", URL)];

    let summary = orchestrator.run(&playlists).await.unwrap();
    let report = &summary.playlists[0];

    assert_eq!(
        report.outcome,
        PlaylistOutcome::Completed { exit_code: Some(1) }
    );
    assert_eq!(report.announced, 2);
    assert_eq!(report.unavailable, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.markers_written, 1);
    assert!(root
        .path()
        .join("Test")
        .join("001 - abc123 - unavailable.txt")
        .is_file());

    let args: Vec<String> = std::fs::read_to_string(&args_file)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert!(args.contains(&"--ignore-errors".to_string()));
    assert!(args.contains(&"--extract-audio".to_string()));
    assert!(args.contains(
        &root
            .path()
            .join("Test")
            .join("downloaded.txt")
            .display()
            .to_string()
    ));
    assert_eq!(args.last().map(String::as_str), Some(URL));
}

#[tokio::test]
async fn test_large_output_is_fully_drained() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();

    // Far more than a pipe buffer on both streams
    let stub = write_stub(
        bin.path(),
        r#"i=1
while [ $i -le 2000 ]; do
  echo "[download] Downloading item $i of 2000"
  echo "[download] 100% of 1.00KiB in 00:00:00 at 1.00KiB/s"
  echo "WARNING: filler line $i on stderr" 1>&2
  i=$((i+1))
done
exit 0"#,
    );

    let config = config_for(root.path(), stub);
    let runner = CommandRunner::new().with_line_buffer(1);
    let orchestrator = Orchestrator::new(&config, runner);

    let summary = orchestrator
        .run(&[PlaylistDescriptor::new("Big", "video", URL)])
        .await
        .unwrap();
    let report = &summary.playlists[0];

    assert!(report.is_clean());
    assert_eq!(report.announced, 2000);
    assert_eq!(report.completed, 2000);
    assert_eq!(report.total_items, 2000);
}

#[tokio::test]
async fn test_watchdog_kills_hung_downloader() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let stub = write_stub(
        bin.path(),
        "echo '[download] Downloading item 1 of 1'\nexec sleep 30",
    );

    let config = config_for(root.path(), stub);
    let runner = CommandRunner::new().with_timeout(Some(Duration::from_secs(1)));
    let orchestrator = Orchestrator::new(&config, runner);

    let summary = tokio::time::timeout(
        Duration::from_secs(20),
        orchestrator.run(&[PlaylistDescriptor::new("Hung", "video", URL)]),
    )
    .await
    .expect("watchdog did not fire")
    .unwrap();

    let report = &summary.playlists[0];
    assert_eq!(report.outcome, PlaylistOutcome::TimedOut { timeout_secs: 1 });
    assert_eq!(report.announced, 1);
}

/// True while `pid` names a live (non-zombie) process.
#[cfg(target_os = "linux")]
fn is_running(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => stat
            .rsplit_once(')')
            .map(|(_, rest)| !rest.trim_start().starts_with('Z'))
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_watchdog_kills_post_processor() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let pid_file = bin.path().join("sleep.pid");
    let stub = write_stub(
        bin.path(),
        &format!(
            r#"echo '[download] Downloading item 1 of 1'
sleep 30 &
echo $! > '{}'
wait"#,
            pid_file.display()
        ),
    );

    let config = config_for(root.path(), stub);
    let runner = CommandRunner::new().with_timeout(Some(Duration::from_secs(1)));
    let orchestrator = Orchestrator::new(&config, runner);

    let summary = orchestrator
        .run(&[PlaylistDescriptor::new("Hung", "video", URL)])
        .await
        .unwrap();
    assert_eq!(
        summary.playlists[0].outcome,
        PlaylistOutcome::TimedOut { timeout_secs: 1 }
    );

    let pid: u32 = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while is_running(pid) && std::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!is_running(pid), "sleep {} outlived the watchdog", pid);
}

#[tokio::test]
async fn test_missing_binary_skips_playlist() {
    let root = TempDir::new().unwrap();
    let config = config_for(root.path(), PathBuf::from("/nonexistent/yt-dlp"));
    let orchestrator = Orchestrator::new(&config, CommandRunner::new());

    let summary = orchestrator
        .run(&[
            PlaylistDescriptor::new("First", "video", URL),
            PlaylistDescriptor::new("Second", "audio", URL),
        ])
        .await
        .unwrap();

    assert_eq!(summary.failed_count(), 2);
    assert!(root.path().join("First").is_dir());
    assert!(root.path().join("Second").is_dir());
}
