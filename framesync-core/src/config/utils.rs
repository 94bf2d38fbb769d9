//! Configuration utility functions
//!
//! Helpers that read a default from an environment variable, falling back to
//! the compiled-in value when the variable is unset or does not parse.

use std::path::PathBuf;

/// Get a string value from an environment variable or use the default
pub fn get_env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

/// Get a u32 value from an environment variable or use the default
pub fn get_env_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a u64 value from an environment variable or use the default
pub fn get_env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variables_fall_back() {
        assert_eq!(get_env_u32("FRAMESYNC_TEST_SURELY_UNSET_U32", 7), 7);
        assert_eq!(get_env_f64("FRAMESYNC_TEST_SURELY_UNSET_F64", 0.5), 0.5);
        assert_eq!(
            get_env_string("FRAMESYNC_TEST_SURELY_UNSET_STR", "x".to_string()),
            "x"
        );
    }
}
