use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn framesync_cmd() -> Command {
    Command::cargo_bin("framesync").expect("Failed to find framesync binary")
}

fn create_log(dir: &Path, filename: &str, rows: usize) {
    let mut content = String::from("t,ax\n");
    for i in 0..rows {
        content.push_str(&format!("{i},0.1\n"));
    }
    fs::write(dir.join(filename), content).expect("Failed to write log");
}

/// Writes executable stand-ins for ffmpeg and ffprobe into `dir`.
///
/// The fake ffprobe reports `source_frames` for any input, or
/// `output_frames` for transient outputs; the fake ffmpeg creates its last
/// argument.
#[cfg(unix)]
fn install_fake_tools(
    dir: &Path,
    source_frames: u64,
    output_frames: u64,
) -> Result<(), Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let ffprobe = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-version\" ]; then echo \"ffprobe version fake\"; exit 0; fi\n\
         case \"$*\" in\n\
           *tmp_align_*) echo {output_frames} ;;\n\
           *) echo {source_frames} ;;\n\
         esac\n\
         echo 7.400000\n"
    );
    let ffmpeg = "#!/bin/sh\n\
         if [ \"$1\" = \"-version\" ]; then echo \"ffmpeg version fake\"; exit 0; fi\n\
         for last; do :; done\n\
         echo aligned > \"$last\"\n";

    for (name, script) in [("ffprobe", ffprobe.as_str()), ("ffmpeg", ffmpeg)] {
        let path = dir.join(name);
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<(), Box<dyn Error>> {
    framesync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("align"))
        .stdout(contains("inspect"))
        .stdout(contains("match"));
    Ok(())
}

#[test]
fn test_align_requires_root() -> Result<(), Box<dyn Error>> {
    framesync_cmd().arg("align").assert().failure();
    Ok(())
}

#[test]
fn test_align_rejects_zero_fps() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    framesync_cmd()
        .arg("align")
        .arg(root.path())
        .args(["--fps", "0"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_align_with_missing_tools_exits_one() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let empty_tools = tempdir()?;
    create_log(root.path(), "data_001.csv", 20);
    fs::write(root.path().join("video_001.mp4"), b"dummy")?;

    framesync_cmd()
        .arg("align")
        .arg(root.path())
        .arg("--tool-dir")
        .arg(empty_tools.path())
        .assert()
        .code(1)
        .stderr(contains("unavailable"));

    assert!(root.path().join("video_001.mp4").exists());
    Ok(())
}

#[test]
fn test_match_reports_companion() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    create_log(root.path(), "data_001.csv", 20);
    fs::write(root.path().join("video_001.mp4"), b"dummy")?;

    framesync_cmd()
        .arg("match")
        .arg(root.path().join("data_001.csv"))
        .assert()
        .success()
        .stdout(contains("video_001.mp4"))
        .stdout(contains("prefix substitution"));
    Ok(())
}

#[test]
fn test_match_without_companion_fails() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    create_log(root.path(), "data_002.csv", 20);

    framesync_cmd()
        .arg("match")
        .arg(root.path().join("data_002.csv"))
        .assert()
        .code(1)
        .stderr(contains("No companion video found"));
    Ok(())
}

#[test]
fn test_inspect_missing_file() -> Result<(), Box<dyn Error>> {
    framesync_cmd()
        .arg("inspect")
        .arg("surely/this/does/not/exist/video.mp4")
        .assert()
        .code(1)
        .stderr(contains("does not exist"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_inspect_with_fake_ffprobe() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let tools = tempdir()?;
    install_fake_tools(tools.path(), 150, 150)?;
    let video = root.path().join("video_001.mp4");
    fs::write(&video, b"dummy")?;

    framesync_cmd()
        .arg("inspect")
        .arg(&video)
        .arg("--tool-dir")
        .arg(tools.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(contains("\"frame_count\": 150"))
        .stdout(contains("\"duration\": 7.4"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_align_dry_run_writes_report_only() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let tools = tempdir()?;
    let reports = tempdir()?;
    install_fake_tools(tools.path(), 150, 150)?;
    create_log(root.path(), "data_001.csv", 150);
    fs::write(root.path().join("video_001.mp4"), b"dummy")?;
    let report = reports.path().join("run.json");

    framesync_cmd()
        .arg("align")
        .arg(root.path())
        .arg("--tool-dir")
        .arg(tools.path())
        .arg("--dry-run")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(contains("would transcode"));

    assert!(root.path().join("video_001.mp4").exists());
    assert!(!root.path().join("video_001.avi").exists());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(json["planned"], 1);
    assert_eq!(json["pairs"][0]["outcome"]["status"], "planned");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_align_end_to_end_with_fake_tools() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let tools = tempdir()?;
    install_fake_tools(tools.path(), 150, 150)?;
    create_log(root.path(), "data_001.csv", 150);
    fs::write(root.path().join("video_001.mp4"), b"dummy")?;

    framesync_cmd()
        .arg("align")
        .arg(root.path())
        .arg("--tool-dir")
        .arg(tools.path())
        .assert()
        .success();

    assert!(!root.path().join("video_001.mp4").exists());
    assert_eq!(fs::read_to_string(root.path().join("video_001.avi"))?.trim(), "aligned");
    let leftovers = fs::read_dir(root.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("tmp_align_"))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_align_verification_failure_exits_two() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let tools = tempdir()?;
    install_fake_tools(tools.path(), 150, 149)?;
    create_log(root.path(), "data_001.csv", 150);
    fs::write(root.path().join("video_001.mp4"), b"dummy")?;

    framesync_cmd()
        .arg("align")
        .arg(root.path())
        .arg("--tool-dir")
        .arg(tools.path())
        .assert()
        .code(2)
        .stdout(contains("failed verification"));

    assert_eq!(fs::read(root.path().join("video_001.mp4"))?, b"dummy");
    assert!(!root.path().join("video_001.avi").exists());
    Ok(())
}
