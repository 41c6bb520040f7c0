//! Configuration for registries
//!
//! A registry carries an [`InjectorConfig`] that decides how resolution treats
//! absent dependencies and whether specs may be derived from source text.
//!
//! Values come from the environment:
//!
//! | Variable                    | Values             | Default  |
//! |-----------------------------|--------------------|----------|
//! | `INJECTOR_MISSING_POLICY`   | `absent`, `error`  | `absent` |
//! | `INJECTOR_PARSE_SIGNATURES` | `true`, `false`    | `true`   |
//!
//! # Example
//!
//! ```rust,no_run
//! use injector::{InjectorConfig, Registry};
//!
//! let config = InjectorConfig::load(std::path::Path::new("."));
//! let registry = Registry::with_config(config);
//! ```

pub mod env;

pub use env::{env, env_optional, load_dotenv};

use std::path::Path;
use std::str::FromStr;

/// What resolution does when a name (or positional argument) has no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Resolve to [`Arg::Missing`](crate::Arg::Missing) and let the callee decide
    #[default]
    Absent,
    /// Fail the resolution with [`InjectorError`](crate::InjectorError)
    Error,
}

impl MissingPolicy {
    /// Check if absent values are turned into errors
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absent" | "lenient" | "undefined" => Ok(Self::Absent),
            "error" | "strict" => Ok(Self::Error),
            other => Err(format!("unknown missing policy '{}'", other)),
        }
    }
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Treatment of names that resolve to nothing
    pub missing: MissingPolicy,
    /// Allow `Registry::inject_parsed` to derive specs from source text
    pub parse_signatures: bool,
}

impl InjectorConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            missing: env("INJECTOR_MISSING_POLICY", MissingPolicy::Absent),
            parse_signatures: env("INJECTOR_PARSE_SIGNATURES", true),
        }
    }

    /// Load `.env` files from `project_root`, then build config from the environment
    pub fn load(project_root: &Path) -> Self {
        load_dotenv(project_root);
        Self::from_env()
    }

    /// Create a builder for customizing config
    pub fn builder() -> InjectorConfigBuilder {
        InjectorConfigBuilder::default()
    }

    /// Check if absent values fail resolution
    pub fn is_strict(&self) -> bool {
        self.missing.is_strict()
    }
}

impl Default for InjectorConfig {
    /// Lenient resolution with signature parsing enabled, independent of the environment
    fn default() -> Self {
        Self {
            missing: MissingPolicy::Absent,
            parse_signatures: true,
        }
    }
}

/// Builder for InjectorConfig
///
/// Unset fields keep their [`Default`] values.
#[derive(Default)]
pub struct InjectorConfigBuilder {
    missing: Option<MissingPolicy>,
    parse_signatures: Option<bool>,
}

impl InjectorConfigBuilder {
    /// Set the missing-value policy
    pub fn missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = Some(policy);
        self
    }

    /// Shorthand for `missing(MissingPolicy::Error)`
    pub fn strict(self) -> Self {
        self.missing(MissingPolicy::Error)
    }

    /// Allow or forbid source-text signature parsing
    pub fn parse_signatures(mut self, enabled: bool) -> Self {
        self.parse_signatures = Some(enabled);
        self
    }

    /// Build the InjectorConfig
    pub fn build(self) -> InjectorConfig {
        let default = InjectorConfig::default();
        InjectorConfig {
            missing: self.missing.unwrap_or(default.missing),
            parse_signatures: self.parse_signatures.unwrap_or(default.parse_signatures),
        }
    }
}
