// ============================================================================
// framesync-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with external command-line
// tools. The alignment logic only ever sees the `CommandRunner` trait:
// arguments in, exit code plus captured stdout/stderr out. This keeps process
// management out of the pipeline and lets tests substitute a scripted runner.
//
// KEY COMPONENTS:
// - CommandRunner trait and CommandOutput
// - SystemCommandRunner: std::process based implementation
// - Tool: the two external tools and how their executables are located
// - check_dependency / check_tools: the up-front availability check
//
// AI-ASSISTANT-INFO: External tool abstraction for ffmpeg/ffprobe

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, command_start_error, tool_unavailable_error};

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Transcoder argument building and execution
pub mod ffmpeg;

/// Scripted command runner for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// COMMAND RUNNER
// ============================================================================

/// Captured result of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

impl CommandOutput {
    /// Returns true when the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program to completion and captures its output.
///
/// Implementations block until the program exits; the engine enforces no
/// timeout of its own. An `Err` means the program could not be started at
/// all. A program that ran and failed is an `Ok` with a nonzero exit code.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        (**self).run(program, args)
    }
}

/// `CommandRunner` backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        log::debug!("Running command: {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| command_start_error(program.display().to_string(), e))?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            log::debug!(
                "Command {} exited with {:?}",
                program.display(),
                result.exit_code
            );
        }

        Ok(result)
    }
}

// ============================================================================
// TOOL LOCATION
// ============================================================================

/// The external tools the engine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
}

impl Tool {
    /// Bare executable name without platform suffix.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
        }
    }

    /// Resolves the executable path for this tool.
    ///
    /// When `tool_dir` is set and exists, the executable is looked up inside
    /// it; otherwise the bare name is returned so the OS searches `PATH`.
    /// On Windows `.exe` is appended.
    pub fn resolve(self, tool_dir: Option<&Path>) -> PathBuf {
        let file_name = if cfg!(windows) {
            format!("{}.exe", self.name())
        } else {
            self.name().to_string()
        };

        match tool_dir {
            Some(dir) if dir.is_dir() => dir.join(file_name),
            Some(dir) => {
                log::warn!(
                    "Tool directory {} does not exist, falling back to PATH for {}",
                    dir.display(),
                    self.name()
                );
                PathBuf::from(file_name)
            }
            None => PathBuf::from(file_name),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a tool starts and exits successfully with `-version`.
///
/// Returns the resolved executable path on success, or
/// `CoreError::ToolUnavailable` if the tool is missing or its version check
/// fails.
pub fn check_dependency<R: CommandRunner>(
    runner: &R,
    tool: Tool,
    tool_dir: Option<&Path>,
) -> CoreResult<PathBuf> {
    let program = tool.resolve(tool_dir);
    let args = vec!["-version".to_string()];

    match runner.run(&program, &args) {
        Ok(output) if output.success() => {
            let version = output.stdout.lines().next().unwrap_or("").trim();
            log::debug!("Found {}: {}", tool, version);
            Ok(program)
        }
        Ok(output) => Err(tool_unavailable_error(
            tool.name(),
            format!(
                "'{} -version' exited with {:?}",
                program.display(),
                output.exit_code
            ),
        )),
        Err(CoreError::CommandStart(_, e)) => {
            log::warn!("Dependency '{}' could not be started: {}", tool, e);
            Err(tool_unavailable_error(
                tool.name(),
                format!("could not run '{}': {}", program.display(), e),
            ))
        }
        Err(e) => Err(e),
    }
}

/// Checks both ffmpeg and ffprobe, in that order.
pub fn check_tools<R: CommandRunner>(runner: &R, config: &CoreConfig) -> CoreResult<()> {
    log::info!("Checking for required external commands...");
    for tool in [Tool::Ffmpeg, Tool::Ffprobe] {
        check_dependency(runner, tool, config.tool_dir.as_deref())?;
        log::info!("  [OK] {} found.", tool);
    }
    Ok(())
}
