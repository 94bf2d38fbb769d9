// framesync-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "framesync: align sensor logs with their videos",
    long_about = "Rewrites each companion video to exactly one frame per sensor-log row at a fixed rate, using ffmpeg and ffprobe."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aligns every log/video pair under a root directory
    Align(AlignArgs),
    /// Prints the frame count and duration of a video
    Inspect(InspectArgs),
    /// Shows which video would be paired with a log, without changing anything
    Match(MatchArgs),
}

/// Options shared by commands that build a configuration.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing the ffmpeg and ffprobe executables
    #[arg(long, value_name = "DIR")]
    pub tool_dir: Option<PathBuf>,

    /// Video extension to consider, in priority order (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Root directory to scan for CSV logs
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Target frame rate, also the log's sampling rate
    #[arg(long, value_name = "FPS", value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: Option<u32>,

    /// Output width in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Plan every pair but do not transcode or modify files
    #[arg(long)]
    pub dry_run: bool,

    /// Re-transcode pairs that already look aligned
    #[arg(long)]
    pub force: bool,

    /// Delete leftover tmp_align_ files before processing
    #[arg(long)]
    pub clean_stale: bool,

    /// Write the run summary as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Video file to measure
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,

    /// Directory containing the ffprobe executable
    #[arg(long, value_name = "DIR")]
    pub tool_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// CSV log to find a companion for
    #[arg(value_name = "CSV")]
    pub log: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}
