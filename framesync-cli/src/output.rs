// framesync-cli/src/output.rs
//
// Human-readable terminal output for command results.

use framesync_core::{AlignmentOutcome, MatchResult, MatchRule, RunSummary, StreamReport};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    println!("\n{}", line.bright_blue());
    println!("{}", format!(" {text} ").bold());
    println!("{}\n", line.bright_blue());
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", label.bright_cyan(), value);
}

fn outcome_tag(outcome: &AlignmentOutcome) -> String {
    match outcome {
        AlignmentOutcome::Aligned { .. } => "[OK]".green().bold().to_string(),
        AlignmentOutcome::AlreadyAligned { .. } => "[OK]".green().to_string(),
        AlignmentOutcome::Planned { .. } => "[PLAN]".cyan().to_string(),
        o if o.is_failure() => "[FAIL]".red().bold().to_string(),
        _ => "[SKIP]".yellow().to_string(),
    }
}

/// Prints one line per pair followed by the totals.
pub fn print_summary(summary: &RunSummary) {
    print_heading("Alignment Summary");
    for pair in &summary.pairs {
        println!(
            "{} {}: {}",
            outcome_tag(&pair.outcome),
            pair.log.display(),
            pair.outcome
        );
    }
    println!();
    print_info("Aligned", summary.aligned.green().bold());
    print_info("Already aligned", summary.already_aligned);
    if summary.planned > 0 {
        print_info("Planned", summary.planned.cyan());
    }
    print_info("Skipped", summary.skipped.yellow());
    if summary.failed > 0 {
        print_info("Failed", summary.failed.red().bold());
    } else {
        print_info("Failed", summary.failed);
    }
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

pub fn print_stream_report(path: &std::path::Path, report: &StreamReport) {
    print_info("File", path.display());
    print_info("Frames", or_unknown(report.frame_count));
    print_info(
        "Duration",
        or_unknown(report.duration.map(|d| format!("{d:.3}s"))),
    );
}

pub fn print_match(log: &std::path::Path, rows: u64, result: Option<&MatchResult>) {
    print_info("Log", log.display());
    print_info("Rows", rows);
    match result {
        Some(found) => {
            let rule = match found.rule {
                MatchRule::PrefixSubstitution => "prefix substitution".to_string(),
                MatchRule::ExactStem => "exact name".to_string(),
                MatchRule::TimestampProximity { delta_secs } => {
                    format!("timestamp proximity ({delta_secs:.0}s apart)")
                }
            };
            print_info("Companion", found.candidate.path.display().green());
            print_info("Rule", rule);
        }
        None => print_info("Companion", "none found".yellow()),
    }
}
