// framesync-cli/src/lib.rs
//
// Library portion of the framesync CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{AlignArgs, Cli, Commands, InspectArgs, MatchArgs};
pub use commands::align::run_align;
pub use commands::companion::run_match;
pub use commands::inspect::run_inspect;
