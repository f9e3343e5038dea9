/*!
 * Tests for the pipeline controller
 */

use std::path::{Path, PathBuf};

use filmfluency::app_config::{Config, SelectionConfig};
use filmfluency::app_controller::{Controller, REPORT_FILE_NAME};
use filmfluency::errors::{AppError, SetupError};

/// Run inside a scratch directory so relative `clips_<id>` output
/// directories don't leak into the workspace.
fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_output_dir_shouldDeriveFromMovieId() {
    assert_eq!(Controller::output_dir(Some("tt42")), PathBuf::from("clips_tt42"));
    assert_eq!(Controller::output_dir(None), PathBuf::from("clips_local"));
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let config = Config {
        selection: SelectionConfig {
            min_words: 0,
            ..SelectionConfig::default()
        },
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_withMissingMovie_shouldAbortWithSetupError() {
    let dir = tempfile::tempdir().unwrap();
    let srt = write_file(dir.path(), "film.srt", crate::common::SAMPLE_SRT);

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller
        .run(&dir.path().join("missing.mp4"), &srt, None, None)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Setup(SetupError::MissingMovie(_)))
    ));
}

#[tokio::test]
async fn test_run_withMissingSubtitles_shouldAbortWithSetupError() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "not really a movie");

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller
        .run(&movie, &dir.path().join("missing.srt"), None, None)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Setup(SetupError::MissingSubtitles(_)))
    ));
}

#[tokio::test]
async fn test_run_withUnparsableSubtitles_shouldAbort() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "x");
    let srt = write_file(dir.path(), "film.srt", "this is not an srt file");

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller.run(&movie, &srt, None, None).await;

    assert!(matches!(result, Err(AppError::Subtitle(_))));
}

/// Zero qualifying entries: the run completes with an empty, header-only
/// report and no media tool is ever invoked.
#[tokio::test]
async fn test_run_withNothingSelected_shouldWriteHeaderOnlyReport() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "x");
    // Real blocks, but every line fails the default word-count floor
    let srt = write_file(
        dir.path(),
        "film.srt",
        "1\n00:00:01,000 --> 00:00:04,000\nRun.\n\n2\n00:00:10,000 --> 00:00:13,000\nStop!\n",
    );

    let movie_id = format!("ctrl_test_{}", std::process::id());
    let output_dir = Controller::output_dir(Some(&movie_id));

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller
        .run(&movie, &srt, Some(&movie_id), None)
        .await
        .unwrap();

    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.scored, 2);
    assert_eq!(summary.selected, 0);
    assert_eq!(summary.extracted, 0);
    assert_eq!(summary.failed, 0);

    let report = std::fs::read_to_string(output_dir.join(REPORT_FILE_NAME)).unwrap();
    assert_eq!(report.lines().count(), 1);

    std::fs::remove_dir_all(&output_dir).unwrap();
}

/// Two entries that clear every default selection threshold.
const COMPLEX_SRT: &str = "1
00:00:10,000 --> 00:00:16,000
The epistemological ramifications of quantum indeterminacy necessitate fundamental reevaluation.

2
00:00:20,000 --> 00:00:26,000
Extraordinary methodological considerations invariably complicate the interpretation of experimental observations.
";

/// Stub ffprobe that reports a sixty second source file.
#[cfg(unix)]
const FFPROBE_OK: &str = "#!/bin/sh
echo '{\"format\": {\"duration\": \"60.000000\"}}'
";

/// Stub ffmpeg that fails for the second clip and creates the output file
/// (its last argument) for everything else.
#[cfg(unix)]
const FFMPEG_FAIL_SECOND_CLIP: &str = "#!/bin/sh
for a in \"$@\"; do
  case \"$a\" in
    *clip_0002*) exit 1 ;;
  esac
done
for a in \"$@\"; do last=\"$a\"; done
: > \"$last\"
";

/// A failing duration probe degrades the run instead of aborting it: every
/// selected entry counts as failed and a header-only report is still written.
#[cfg(unix)]
#[tokio::test]
async fn test_run_withFailingProbeTool_shouldStillWriteReport() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "not really a movie");
    let srt = write_file(dir.path(), "film.srt", COMPLEX_SRT);

    let tools = tempfile::tempdir().unwrap();
    crate::common::install_stub_tool(tools.path(), "ffprobe", "#!/bin/sh\nexit 1\n");
    let _tools = crate::common::ToolPathOverride::to(tools.path());

    let movie_id = format!("ctrl_probe_{}", std::process::id());
    let output_dir = Controller::output_dir(Some(&movie_id));

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller
        .run(&movie, &srt, Some(&movie_id), None)
        .await
        .unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.extracted, 0);
    assert_eq!(summary.failed, 2);

    let report = std::fs::read_to_string(output_dir.join(REPORT_FILE_NAME)).unwrap();
    assert_eq!(report.lines().count(), 1);

    std::fs::remove_dir_all(&output_dir).unwrap();
}

/// One entry's ffmpeg failure doesn't abort the run: the other entry lands
/// in the report and each of its finalized assets reaches the uploader.
#[cfg(unix)]
#[tokio::test]
async fn test_run_withOneFailingExtraction_shouldReportTheRest() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "not really a movie");
    let srt = write_file(dir.path(), "film.srt", COMPLEX_SRT);

    let tools = tempfile::tempdir().unwrap();
    crate::common::install_stub_tool(tools.path(), "ffprobe", FFPROBE_OK);
    crate::common::install_stub_tool(tools.path(), "ffmpeg", FFMPEG_FAIL_SECOND_CLIP);
    let _tools = crate::common::ToolPathOverride::to(tools.path());

    let movie_id = format!("ctrl_part_{}", std::process::id());
    let output_dir = Controller::output_dir(Some(&movie_id));

    let recorder = crate::common::RecordingUploader::new();
    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller
        .run(&movie, &srt, Some(&movie_id), Some(&recorder))
        .await
        .unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.failed, 1);

    // Entry 2 scores as more complex, gets extracted first and fails;
    // entry 1 survives into the report
    let report = std::fs::read_to_string(output_dir.join(REPORT_FILE_NAME)).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("1,"));
    assert!(lines[1].contains("clip_0001.mp4"));

    // Clip and audio track of the surviving entry, in production order
    assert_eq!(
        recorder.recorded_keys(),
        vec![
            format!("{}/clip_0001.mp4", movie_id),
            format!("{}/audio_0001.wav", movie_id),
        ]
    );

    std::fs::remove_dir_all(&output_dir).unwrap();
}

/// Malformed blocks are counted in the summary but don't abort the run
#[tokio::test]
async fn test_run_withMalformedBlock_shouldCountSkippedBlocks() {
    let dir = tempfile::tempdir().unwrap();
    let movie = write_file(dir.path(), "film.mp4", "x");
    let srt = write_file(
        dir.path(),
        "film.srt",
        "1\n00:00:01,000 --> 00:00:04,000\nRun.\n\n2\nno time range here\n",
    );

    let movie_id = format!("ctrl_skip_{}", std::process::id());
    let output_dir = Controller::output_dir(Some(&movie_id));

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller
        .run(&movie, &srt, Some(&movie_id), None)
        .await
        .unwrap();

    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.skipped_blocks, 1);

    std::fs::remove_dir_all(&output_dir).unwrap();
}
