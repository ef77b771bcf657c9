//! Environment-driven settings with warn-level logging for invalid values.

/// Base URL of the remote server.
pub const API_URL_VAR: &str = "ROLODEX_API_URL";
/// Path of the person collection, relative to the base URL.
pub const COLLECTION_PATH_VAR: &str = "ROLODEX_COLLECTION_PATH";
/// Per-request timeout, in seconds.
pub const HTTP_TIMEOUT_VAR: &str = "ROLODEX_HTTP_TIMEOUT_SECS";
/// Which body the collection adopts after a successful replace (`server` or `draft`).
pub const REPLACE_POLICY_VAR: &str = "ROLODEX_REPLACE_POLICY";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_COLLECTION_PATH: &str = "/api/persons/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Parse an environment variable with a default fallback.
///
/// An unset variable returns `default` silently. A set but unparseable one
/// logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read a string variable, treating unset and blank values as absent.
pub fn env_string_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_valid_timeout() {
        let var_name = "TEST_ROLODEX_TIMEOUT_VALID_40211";
        unsafe { std::env::set_var(var_name, "5") };
        let result: u64 = env_parse_with_default(var_name, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(result, 5);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_garbage_falls_back() {
        let var_name = "TEST_ROLODEX_TIMEOUT_GARBAGE_40212";
        unsafe { std::env::set_var(var_name, "soon") };
        let result: u64 = env_parse_with_default(var_name, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(result, DEFAULT_HTTP_TIMEOUT_SECS);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "TEST_ROLODEX_TIMEOUT_MISSING_40213";
        unsafe { std::env::remove_var(var_name) };
        let result: u64 = env_parse_with_default(var_name, 7);
        assert_eq!(result, 7);
    }

    #[test]
    fn test_env_string_blank_uses_default() {
        let var_name = "TEST_ROLODEX_URL_BLANK_40214";
        unsafe { std::env::set_var(var_name, "   ") };
        assert_eq!(env_string_or(var_name, DEFAULT_API_URL), DEFAULT_API_URL);
        unsafe { std::env::set_var(var_name, " http://contacts.local ") };
        assert_eq!(env_string_or(var_name, DEFAULT_API_URL), "http://contacts.local");
        unsafe { std::env::remove_var(var_name) };
    }
}
