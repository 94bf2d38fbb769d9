//! Implementation of the 'inspect' subcommand.

use crate::cli::InspectArgs;
use crate::error::CliResult;
use crate::output;

use framesync_core::external::check_dependency;
use framesync_core::{
    CoreConfig, CoreError, StreamInspector, StreamReport, SystemCommandRunner, Tool,
};

/// Measures one video and prints its frame count and duration.
///
/// Fails if ffprobe is unavailable or the video has no readable frames.
pub fn run_inspect(args: &InspectArgs) -> CliResult<StreamReport> {
    if !args.video.is_file() {
        return Err(CoreError::PathError(format!(
            "Video '{}' does not exist or is not a file",
            args.video.display()
        )));
    }

    let mut config = CoreConfig::default();
    if let Some(dir) = &args.tool_dir {
        config.tool_dir = Some(dir.clone());
    }

    let runner = SystemCommandRunner;
    check_dependency(&runner, Tool::Ffprobe, config.tool_dir.as_deref())?;
    let report = StreamInspector::new(&runner, &config).inspect(&args.video);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_stream_report(&args.video, &report);
    }

    if !report.is_readable() {
        return Err(CoreError::SourceUnreadable(args.video.clone()));
    }
    Ok(report)
}
