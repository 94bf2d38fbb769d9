//! Implementation of the 'align' subcommand.
//!
//! Builds the configuration from the config file and flags, runs the core
//! alignment pass over the root directory and optionally writes the JSON
//! report.

use crate::cli::AlignArgs;
use crate::commands::base_builder;
use crate::error::CliResult;

use framesync_core::{CoreConfig, RunSummary, SystemCommandRunner, run_alignment};

use log::info;
use std::time::Instant;

/// Resolves the effective configuration for an `align` invocation.
pub fn build_align_config(args: &AlignArgs) -> CliResult<CoreConfig> {
    let mut builder = base_builder(&args.config, args.root.clone())?;
    // Only the final configuration is validated; flags may repair the file
    let base = builder.current();
    let (width, height) = (args.width.unwrap_or(base.width), args.height.unwrap_or(base.height));
    let dry_run = base.dry_run || args.dry_run;
    let force = base.force || args.force;
    let clean_stale = base.clean_stale || args.clean_stale;

    if let Some(fps) = args.fps {
        builder = builder.target_fps(fps);
    }

    builder
        .frame_size(width, height)
        .dry_run(dry_run)
        .force(force)
        .clean_stale(clean_stale)
        .build()
}

/// Runs the alignment and returns the summary.
pub fn run_align(args: &AlignArgs) -> CliResult<RunSummary> {
    let started = Instant::now();
    let config = build_align_config(args)?;

    info!("Root directory: {}", config.root_dir.display());
    info!(
        "Target: {} fps, {}x{}, {} q{}",
        config.target_fps, config.width, config.height, config.video_codec, config.video_quality
    );

    let summary = run_alignment(&SystemCommandRunner, &config)?;

    if let Some(report) = &args.report {
        summary.write_json(report)?;
        info!("Report written to {}", report.display());
    }

    info!("Finished in {:.1}s", started.elapsed().as_secs_f64());
    Ok(summary)
}
