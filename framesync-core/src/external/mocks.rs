// framesync-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled for tests or when the "test-mocks" feature is enabled.

use super::{CommandOutput, CommandRunner, Tool};
use crate::error::{CoreResult, command_start_error};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// What a mocked command does when matched.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The command ran and produced this output
    Output(CommandOutput),
    /// The command could not be started
    StartError(io::ErrorKind),
}

/// An expected command and its scripted result.
#[derive(Debug, Clone)]
pub struct MockExpectation {
    pub tool: Tool,
    /// Matched if any argument contains this substring
    pub arg_pattern: String,
    pub response: MockResponse,
    /// Create an empty file at the last argument (the output path)
    pub create_dummy_output: bool,
    /// Consumed after the first match
    pub once: bool,
}

/// Scripted `CommandRunner` that records every call it receives.
///
/// Expectations are checked in insertion order. A call with no matching
/// expectation behaves like a missing executable.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    expectations: Rc<RefCell<Vec<MockExpectation>>>,
    received_calls: Rc<RefCell<Vec<(String, Vec<String>)>>>,
}

/// Formats ffprobe's bare-value output for a frame count and duration.
pub fn probe_output(frames: Option<u64>, duration: Option<f64>) -> CommandOutput {
    let frames = frames.map_or_else(|| "N/A".to_string(), |f| f.to_string());
    let duration = duration.map_or_else(|| "N/A".to_string(), |d| format!("{d:.6}"));
    CommandOutput {
        exit_code: Some(0),
        stdout: format!("{frames}\n{duration}\n"),
        stderr: String::new(),
    }
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(&self, expectation: MockExpectation) {
        self.expectations.borrow_mut().push(expectation);
    }

    /// Both `-version` checks succeed, for any number of calls.
    pub fn with_tools_available(self) -> Self {
        for tool in [Tool::Ffmpeg, Tool::Ffprobe] {
            self.add_expectation(MockExpectation {
                tool,
                arg_pattern: "-version".to_string(),
                response: MockResponse::Output(CommandOutput {
                    exit_code: Some(0),
                    stdout: format!("{} version mock\n", tool.name()),
                    stderr: String::new(),
                }),
                create_dummy_output: false,
                once: false,
            });
        }
        self
    }

    /// ffprobe calls mentioning `arg_pattern` report the given stream.
    pub fn expect_probe(&self, arg_pattern: &str, frames: Option<u64>, duration: Option<f64>) {
        self.add_expectation(MockExpectation {
            tool: Tool::Ffprobe,
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::Output(probe_output(frames, duration)),
            create_dummy_output: false,
            once: false,
        });
    }

    /// Like `expect_probe`, but consumed by the first matching call.
    pub fn expect_probe_once(&self, arg_pattern: &str, frames: Option<u64>, duration: Option<f64>) {
        self.add_expectation(MockExpectation {
            tool: Tool::Ffprobe,
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::Output(probe_output(frames, duration)),
            create_dummy_output: false,
            once: true,
        });
    }

    /// One successful ffmpeg call that leaves a dummy output file behind.
    pub fn expect_transcode_success(&self, arg_pattern: &str) {
        self.add_expectation(MockExpectation {
            tool: Tool::Ffmpeg,
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::Output(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            }),
            create_dummy_output: true,
            once: true,
        });
    }

    /// One failing ffmpeg call, optionally leaving a partial output behind.
    pub fn expect_transcode_failure(
        &self,
        arg_pattern: &str,
        exit_code: i32,
        stderr: &str,
        partial_output: bool,
    ) {
        self.add_expectation(MockExpectation {
            tool: Tool::Ffmpeg,
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::Output(CommandOutput {
                exit_code: Some(exit_code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            create_dummy_output: partial_output,
            once: true,
        });
    }

    /// One call to `tool` that fails to start, as if the executable vanished.
    pub fn expect_start_failure(&self, tool: Tool, arg_pattern: &str, kind: io::ErrorKind) {
        self.add_expectation(MockExpectation {
            tool,
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::StartError(kind),
            create_dummy_output: false,
            once: true,
        });
    }

    /// Every call received so far, as `(tool name, args)`.
    pub fn get_received_calls(&self) -> Vec<(String, Vec<String>)> {
        self.received_calls.borrow().clone()
    }

    /// Argument lists of received calls to `tool`, excluding `-version` checks.
    pub fn calls_to(&self, tool: Tool) -> Vec<Vec<String>> {
        self.received_calls
            .borrow()
            .iter()
            .filter(|(name, args)| name == tool.name() && args.iter().all(|a| a != "-version"))
            .map(|(_, args)| args.clone())
            .collect()
    }
}

fn tool_name(program: &Path) -> String {
    program
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn create_dummy_file(args: &[String]) {
    let Some(output) = args.last() else {
        log::warn!("MockCommandRunner couldn't find output path in args to create dummy file.");
        return;
    };
    let output_path = PathBuf::from(output);
    match std::fs::write(&output_path, b"mock output") {
        Ok(()) => log::debug!("MockCommandRunner created dummy output file: {:?}", output_path),
        Err(e) => log::error!(
            "MockCommandRunner failed to create dummy output file {:?}: {}",
            output_path,
            e
        ),
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        let name = tool_name(program);
        self.received_calls
            .borrow_mut()
            .push((name.clone(), args.to_vec()));

        let expectation = {
            let mut expectations = self.expectations.borrow_mut();
            let found = expectations.iter().position(|exp| {
                exp.tool.name() == name && args.iter().any(|arg| arg.contains(&exp.arg_pattern))
            });
            match found {
                Some(index) if expectations[index].once => Some(expectations.remove(index)),
                Some(index) => Some(expectations[index].clone()),
                None => None,
            }
        };

        let Some(expectation) = expectation else {
            log::warn!("MockCommandRunner: No expectation found for {} {:?}", name, args);
            return Err(command_start_error(
                program.display().to_string(),
                io::Error::new(io::ErrorKind::NotFound, "no mock expectation"),
            ));
        };

        match expectation.response {
            MockResponse::Output(output) => {
                if expectation.create_dummy_output {
                    create_dummy_file(args);
                }
                Ok(output)
            }
            MockResponse::StartError(kind) => Err(command_start_error(
                program.display().to_string(),
                io::Error::new(kind, "mock start failure"),
            )),
        }
    }
}
