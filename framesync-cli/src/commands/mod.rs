//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use crate::cli::ConfigArgs;
use crate::error::CliResult;

use framesync_core::{CoreConfig, CoreConfigBuilder};
use std::path::PathBuf;

/// `align`: the full alignment run.
pub mod align;

/// `inspect`: ffprobe measurement of a single video.
pub mod inspect;

/// `match`: companion lookup for a single log.
pub mod companion;

/// Layers the shared flags over the config file (or env/defaults).
pub(crate) fn base_builder(args: &ConfigArgs, root_dir: PathBuf) -> CliResult<CoreConfigBuilder> {
    let base = match &args.config {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::default(),
    };

    let mut builder = CoreConfigBuilder::from_config(base).root_dir(root_dir);
    if !args.extensions.is_empty() {
        builder = builder.video_extensions(args.extensions.clone());
    }
    if let Some(dir) = &args.tool_dir {
        builder = builder.tool_dir(dir.clone());
    }
    Ok(builder)
}
