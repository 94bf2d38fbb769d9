// ============================================================================
// framesync-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type; this module adds the alias and the
// mapping from outcomes to process exit codes.

// ---- Internal crate imports ----
use framesync_core::{CoreResult, RunSummary};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Exit code for a command that could not run at all.
pub const EXIT_ERROR: i32 = 1;

/// Exit code for a run in which at least one pair failed.
pub const EXIT_PAIR_FAILURES: i32 = 2;

/// Exit code for a finished run.
pub fn exit_code_for(summary: &RunSummary) -> i32 {
    if summary.has_failures() {
        EXIT_PAIR_FAILURES
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framesync_core::AlignmentOutcome;
    use std::path::Path;

    #[test]
    fn test_exit_codes() {
        let mut summary = RunSummary::new();
        summary.record(Path::new("a.csv"), AlignmentOutcome::SkippedNoMatch);
        assert_eq!(exit_code_for(&summary), 0);

        summary.record(
            Path::new("b.csv"),
            AlignmentOutcome::FailedVerification {
                expected: 10,
                actual: Some(9),
            },
        );
        assert_eq!(exit_code_for(&summary), EXIT_PAIR_FAILURES);
    }
}
