//! Environment variable parsing utilities.
//!
//! Small helpers for the `REST_SYNTH_*` configuration variables so callers
//! don't repeat the parse-with-fallback boilerplate.
//!
//! # Example
//!
//! ```
//! use rest_synth_types::env_utils::{env_bool, env_var, env_var_or};
//!
//! let timeout: u64 = env_var_or("REST_SYNTH_EXAMPLE_TIMEOUT_SECS", 30);
//! let custom: Option<u64> = env_var("REST_SYNTH_EXAMPLE_UNSET");
//! let verbose = env_bool("REST_SYNTH_EXAMPLE_VERBOSE");
//! # let _ = (timeout, custom, verbose);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Check if an environment variable is set to a truthy value.
///
/// Returns `true` if the variable is set to "1", "true", "yes", or "on" (case-insensitive).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Read a string variable, treating blank values as unset.
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parses_and_falls_back() {
        std::env::set_var("REST_SYNTH_TEST_ENV_NUM", " 42 ");
        assert_eq!(env_var::<u64>("REST_SYNTH_TEST_ENV_NUM"), Some(42));
        std::env::set_var("REST_SYNTH_TEST_ENV_BAD", "not-a-number");
        assert_eq!(env_var_or::<u64>("REST_SYNTH_TEST_ENV_BAD", 7), 7);
        assert_eq!(env_var::<u64>("REST_SYNTH_TEST_ENV_MISSING"), None);
    }

    #[test]
    fn test_env_bool_and_non_empty() {
        std::env::set_var("REST_SYNTH_TEST_ENV_FLAG", "Yes");
        assert!(env_bool("REST_SYNTH_TEST_ENV_FLAG"));
        std::env::set_var("REST_SYNTH_TEST_ENV_BLANK", "   ");
        assert_eq!(env_non_empty("REST_SYNTH_TEST_ENV_BLANK"), None);
        assert!(!env_bool("REST_SYNTH_TEST_ENV_BLANK"));
    }
}
