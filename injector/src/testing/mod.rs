//! Testing utilities for registries
//!
//! Provides a Jest-like `expect!` macro for fluent assertions with clear
//! expected/received output, plus matchers for registry contents.
//!
//! # Example
//!
//! ```rust
//! use injector::{expect, Registry};
//!
//! let registry = Registry::new();
//! registry.set("db", "postgres://localhost");
//!
//! expect!(&registry).to_have_dependency("db");
//! expect!(registry.len()).to_equal(1);
//! ```

mod expect;

pub use expect::Expect;

/// Start a fluent assertion on a value
///
/// The failure message names the file and line of the assertion.
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}
