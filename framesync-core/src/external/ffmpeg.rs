//! ffmpeg invocation for the alignment transcode.
//!
//! A single pass rescales the companion video, pads its tail by cloning the
//! last frame, resamples to the target rate and stops after exactly `T`
//! frames. When the planner detected rate drift, `-r` is placed before `-i`
//! so ffmpeg reinterprets the input timing instead of dropping or
//! duplicating frames.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{CommandRunner, Tool};
use crate::processing::plan::TranscodePlan;

use log::{debug, info};

/// Maximum number of stderr characters carried into a failure reason.
pub const STDERR_EXCERPT_CHARS: usize = 500;

/// Builds the `-vf` filter chain: scale, tail padding, then rate conversion.
pub fn build_filter_chain(plan: &TranscodePlan) -> String {
    format!(
        "scale={}:{}:flags=bicubic,tpad=stop_mode=clone:stop_duration={},fps={}",
        plan.width, plan.height, plan.padding_seconds, plan.target_rate
    )
}

/// Builds the full ffmpeg argument list for a plan. The output path is last.
pub fn build_transcode_args(plan: &TranscodePlan, config: &CoreConfig) -> Vec<String> {
    let mut args: Vec<String> = ["-y", "-loglevel", "error", "-fflags", "+genpts"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if let Some(rate) = plan.corrected_input_rate {
        args.push("-r".to_string());
        args.push(format!("{rate:.6}"));
    }

    args.push("-i".to_string());
    args.push(plan.source.to_string_lossy().into_owned());
    args.push("-vf".to_string());
    args.push(build_filter_chain(plan));
    args.extend([
        "-vsync".to_string(),
        "1".to_string(),
        "-frames:v".to_string(),
        plan.target_frame_count.to_string(),
        "-an".to_string(),
        "-c:v".to_string(),
        config.video_codec.clone(),
        "-q:v".to_string(),
        config.video_quality.to_string(),
    ]);
    args.push(plan.output_path.to_string_lossy().into_owned());
    args
}

/// Truncates ffmpeg's stderr for inclusion in an error.
pub fn stderr_excerpt(stderr: &str) -> String {
    format!("{:.*}", STDERR_EXCERPT_CHARS, stderr.trim())
}

/// Runs the transcode described by `plan`, writing to `plan.output_path`.
///
/// A nonzero exit becomes `CoreError::TranscodeFailed` carrying the first
/// 500 characters of stderr. The caller is responsible for removing any
/// partial output.
pub fn run_transcode<R: CommandRunner>(
    runner: &R,
    config: &CoreConfig,
    plan: &TranscodePlan,
) -> CoreResult<()> {
    let program = Tool::Ffmpeg.resolve(config.tool_dir.as_deref());
    let args = build_transcode_args(plan, config);

    info!(
        "Transcoding {} -> {} ({} frames @ {} fps, pad {:.3}s)",
        plan.source.display(),
        plan.output_path.display(),
        plan.target_frame_count,
        plan.target_rate,
        plan.padding_seconds
    );
    debug!("ffmpeg {}", args.join(" "));

    let output = runner.run(&program, &args)?;
    if output.success() {
        return Ok(());
    }

    let stderr = if output.stderr.trim().is_empty() {
        format!("ffmpeg exited with {:?}", output.exit_code)
    } else {
        stderr_excerpt(&output.stderr)
    };
    Err(CoreError::TranscodeFailed {
        source_path: plan.source.clone(),
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_plan(corrected: Option<f64>) -> TranscodePlan {
        TranscodePlan {
            source: PathBuf::from("/d/video_001.mp4"),
            target_frame_count: 150,
            target_rate: 20,
            width: 640,
            height: 480,
            padding_seconds: 2.1,
            corrected_input_rate: corrected,
            output_path: PathBuf::from("/d/tmp_align_data_001_42.avi"),
            target_path: PathBuf::from("/d/video_001.avi"),
        }
    }

    #[test]
    fn test_filter_chain() {
        assert_eq!(
            build_filter_chain(&sample_plan(None)),
            "scale=640:480:flags=bicubic,tpad=stop_mode=clone:stop_duration=2.1,fps=20"
        );
    }

    #[test]
    fn test_args_without_rate_override() {
        let config = CoreConfig::default();
        let args = build_transcode_args(&sample_plan(None), &config);
        let expected: Vec<String> = [
            "-y",
            "-loglevel",
            "error",
            "-fflags",
            "+genpts",
            "-i",
            "/d/video_001.mp4",
            "-vf",
            "scale=640:480:flags=bicubic,tpad=stop_mode=clone:stop_duration=2.1,fps=20",
            "-vsync",
            "1",
            "-frames:v",
            "150",
            "-an",
            "-c:v",
            "mjpeg",
            "-q:v",
            "3",
            "/d/tmp_align_data_001_42.avi",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_rate_override_precedes_input() {
        let config = CoreConfig::default();
        let args = build_transcode_args(&sample_plan(Some(19.2)), &config);
        let r = args.iter().position(|a| a == "-r").unwrap();
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[r + 1], "19.200000");
        assert!(r < i);
    }

    #[test]
    fn test_stderr_excerpt_is_bounded() {
        let long = "é".repeat(800);
        let excerpt = stderr_excerpt(&long);
        assert_eq!(excerpt.chars().count(), STDERR_EXCERPT_CHARS);
        assert_eq!(stderr_excerpt("  short error\n"), "short error");
    }
}
