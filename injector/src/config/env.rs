use std::path::Path;

/// Load environment variables from .env files
///
/// Precedence (later entries override earlier):
/// 1. .env (base defaults)
/// 2. .env.local (local overrides, not committed)
/// 3. Actual system environment variables (highest priority)
pub fn load_dotenv(project_root: &Path) {
    // dotenvy never overwrites variables that are already set, so the most
    // specific file has to be loaded first
    let _ = dotenvy::from_path(project_root.join(".env.local"));
    let _ = dotenvy::from_path(project_root.join(".env"));
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use injector::config::env;
///
/// let parse: bool = env("INJECTOR_PARSE_SIGNATURES", true);
/// ```
///
/// A value that is set but does not parse logs a warning and yields `default`.
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "ignoring unparsable environment variable");
            default
        }
    }
}

/// Get an optional environment variable
///
/// Unset and unparsable values both yield `None`.
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_falls_back_to_default() {
        let value: u16 = env("INJECTOR_TEST_UNSET_VARIABLE", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_env_unparsable_value_uses_default() {
        std::env::set_var("INJECTOR_TEST_ENV_TYPO", "tru");
        let value: bool = env("INJECTOR_TEST_ENV_TYPO", false);
        assert!(!value);
        std::env::remove_var("INJECTOR_TEST_ENV_TYPO");
    }

    #[test]
    fn test_env_optional_parses_value() {
        std::env::set_var("INJECTOR_TEST_ENV_OPTIONAL", " 42 ");
        let value: Option<u32> = env_optional("INJECTOR_TEST_ENV_OPTIONAL");
        assert_eq!(value, Some(42));
        std::env::remove_var("INJECTOR_TEST_ENV_OPTIONAL");
    }

    #[test]
    fn test_env_optional_rejects_garbage() {
        std::env::set_var("INJECTOR_TEST_ENV_GARBAGE", "not-a-number");
        let value: Option<u32> = env_optional("INJECTOR_TEST_ENV_GARBAGE");
        assert_eq!(value, None);
        std::env::remove_var("INJECTOR_TEST_ENV_GARBAGE");
    }
}
