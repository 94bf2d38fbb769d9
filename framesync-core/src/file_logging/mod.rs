//! Optional persistent logging through log4rs.

pub mod setup;

pub use setup::{log_file_path, setup_file_logging};
