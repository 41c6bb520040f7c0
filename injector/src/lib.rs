//! Named dependency registry with injection-wrapped functions
//!
//! Register values under string names, then wrap functions so their
//! arguments are looked up by name when they are called:
//!
//! ```rust
//! use std::sync::Arc;
//! use injector::{args, injectable, Registry};
//!
//! #[injectable]
//! fn connect(#[positional] timeout_secs: Arc<u64>, database_url: Arc<String>) -> String {
//!     format!("{} ({}s)", database_url, timeout_secs)
//! }
//!
//! let registry = Registry::new();
//! registry.set("database_url", String::from("postgres://localhost"));
//!
//! let connect = registry.inject_injectable::<ConnectInjectable>();
//! assert_eq!(connect.call(args![30u64]).unwrap(), "postgres://localhost (30s)");
//! ```

extern crate self as injector;

pub mod config;
pub mod error;
pub mod registry;
pub mod signature;
pub mod testing;

pub use config::{InjectorConfig, InjectorConfigBuilder, MissingPolicy};
pub use error::InjectorError;
pub use registry::{
    Arg, Args, Dependency, FromArg, Injectable, Injected, InjectionSpec, Registry,
    RegistryContext, SpecEntry,
};

pub use injector_macros::injectable;
