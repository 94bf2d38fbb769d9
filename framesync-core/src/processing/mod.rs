//! Core alignment logic and orchestration.
//!
//! This module organizes the alignment steps into submodules and exposes the
//! primary functions for running them.

/// Expected vs. measured duration and input rate correction
pub mod drift;

/// Transcode parameters and output locations
pub mod plan;

/// Verification and replacement of the original video
pub mod commit;

/// Per-log orchestration and the run loop
pub mod pipeline;

pub use drift::{DriftAssessment, estimate};
pub use pipeline::{AlignContext, align_log, process_logs, run_alignment};
pub use plan::{TranscodePlan, canonical_target_path, plan};
