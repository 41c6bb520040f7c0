//! Named dependency registry
//!
//! This module provides the registry at the center of the crate:
//! - Named values: any `Send + Sync` value stored under a string name
//! - Batch registration and merging between registries
//! - Spec resolution: turn an [`InjectionSpec`] plus caller arguments into
//!   the argument list of a wrapped function
//! - Injection wrappers: functions whose arguments are resolved at call time
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use injector::{args, spec, Args, InjectorError, Registry};
//!
//! let registry = Registry::new();
//! registry.set("greeting", String::from("hello"));
//!
//! let greet = registry.inject(
//!     |args: Args| -> Result<String, InjectorError> {
//!         let greeting: Arc<String> = args.extract(0)?;
//!         let name: Arc<&str> = args.extract(1)?;
//!         Ok(format!("{} {}", greeting, name))
//!     },
//!     spec!["greeting", null],
//! );
//!
//! assert_eq!(greet.call(args![(), "world"]).unwrap(), "hello world");
//! ```

pub mod dependency;
pub mod injected;
pub mod spec;

pub use dependency::{Arg, Args, Dependency, FromArg};
pub use injected::{Injectable, Injected, RegistryContext};
pub use spec::{InjectionSpec, SpecEntry};

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::InjectorConfig;
use crate::error::InjectorError;

type Dependencies = HashMap<String, Dependency>;

/// A named dependency container
///
/// `Registry` is a handle: clones share the same mapping, so a wrapper created
/// by [`Registry::inject`] sees dependencies registered after it was created.
/// Use [`Registry::seeded`] for an independent copy.
#[derive(Clone)]
pub struct Registry {
    dependencies: Arc<RwLock<Dependencies>>,
    config: InjectorConfig,
}

impl Registry {
    /// Create an empty registry with the default config
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    /// Create an empty registry with `config`
    pub fn with_config(config: InjectorConfig) -> Self {
        Self {
            dependencies: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Create a registry holding a snapshot of `other`'s dependencies and config
    ///
    /// # Example
    /// ```rust
    /// use injector::Registry;
    ///
    /// let base = Registry::new();
    /// base.set("db", "postgres://localhost");
    ///
    /// let child = Registry::seeded(&base);
    /// child.set("db", "sqlite::memory:");
    ///
    /// assert_eq!(base.get("db").unwrap().downcast_ref::<&str>(), Some(&"postgres://localhost"));
    /// ```
    pub fn seeded(other: &Registry) -> Self {
        let registry = Self::with_config(other.config.clone());
        registry.merge(other);
        registry
    }

    /// The configuration this registry resolves with
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, Dependencies> {
        self.dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Dependencies> {
        self.dependencies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a dependency, replacing any value under the same name
    ///
    /// # Example
    /// ```rust
    /// use injector::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.set("retries", 3u8);
    /// assert!(registry.has("retries"));
    /// ```
    pub fn set<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        let name = name.into();
        let dependency = Dependency::new(value);
        tracing::debug!(dependency = %name, type_name = dependency.type_name(), "registering dependency");
        self.write().insert(name, dependency);
    }

    /// Register several dependencies at once, in iteration order
    ///
    /// Mixed value types can be registered by wrapping them in [`Dependency`].
    pub fn set_all<I, K, T>(&self, dependencies: I)
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Any + Send + Sync,
    {
        // Collect before locking; the iterator may read this registry
        let pairs: Vec<(String, Dependency)> = dependencies
            .into_iter()
            .map(|(name, value)| (name.into(), Dependency::new(value)))
            .collect();

        tracing::debug!(count = pairs.len(), "registered dependencies");
        self.write().extend(pairs);
    }

    /// Look up a dependency
    pub fn get(&self, name: &str) -> Option<Dependency> {
        self.read().get(name).cloned()
    }

    /// Look up a dependency as `T`
    ///
    /// Fails with [`InjectorError::MissingDependency`] when the name is not
    /// registered and [`InjectorError::TypeMismatch`] when it holds another type.
    pub fn resolve<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, InjectorError> {
        let dependency = self
            .get(name)
            .ok_or_else(|| InjectorError::missing_dependency(name))?;
        dependency.downcast::<T>().ok_or_else(|| {
            InjectorError::type_mismatch::<T>(
                format!("dependency '{}'", name),
                dependency.type_name(),
            )
        })
    }

    /// Check if a name is registered in this registry
    pub fn has(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered dependencies
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy every dependency of `other` into this registry, overwriting on collision
    ///
    /// This is a one-time snapshot; later changes to `other` are not seen here.
    pub fn merge(&self, other: &Registry) {
        if Arc::ptr_eq(&self.dependencies, &other.dependencies) {
            return;
        }
        // Snapshot first so the read lock on `other` is released before writing
        let snapshot: Vec<(String, Dependency)> = other
            .read()
            .iter()
            .map(|(name, dependency)| (name.clone(), dependency.clone()))
            .collect();

        tracing::debug!(count = snapshot.len(), "merging dependencies");
        self.write().extend(snapshot);
    }

    /// Resolve `spec` against this registry, using `defaults` as the caller's arguments
    ///
    /// An empty spec returns `defaults` unchanged. Otherwise the result has one
    /// entry per spec entry:
    ///
    /// - a name resolves to its registered value, or to the caller's argument
    ///   at the same position when the name is not registered
    /// - a destructuring entry resolves to a map of alias → registered value
    /// - the positional marker takes the caller's argument at that position
    ///
    /// Anything that resolves to nothing becomes [`Arg::Missing`], or an error
    /// when the config's missing policy is `Error`.
    pub fn get_all(&self, spec: &InjectionSpec, defaults: Vec<Arg>) -> Result<Vec<Arg>, InjectorError> {
        if spec.is_empty() {
            return Ok(defaults);
        }

        let dependencies = self.read();
        let mut defaults: Vec<Option<Arg>> = defaults.into_iter().map(Some).collect();
        let mut take_default = |position: usize| {
            defaults
                .get_mut(position)
                .and_then(Option::take)
                .filter(|arg| !arg.is_missing())
        };

        spec.entries()
            .iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                SpecEntry::Name(name) => {
                    if let Some(dependency) = dependencies.get(name) {
                        tracing::trace!(dependency = %name, position, "resolved from registry");
                        return Ok(Arg::Value(dependency.clone()));
                    }
                    match take_default(position) {
                        Some(arg) => Ok(arg),
                        None => self.missing(InjectorError::missing_dependency(name.as_str())),
                    }
                }
                SpecEntry::Destructure(aliases) => aliases
                    .iter()
                    .map(|(alias, name)| -> Result<(String, Arg), InjectorError> {
                        let arg = match dependencies.get(name) {
                            Some(dependency) => Arg::Value(dependency.clone()),
                            None => self.missing(InjectorError::missing_dependency(name.as_str()))?,
                        };
                        Ok((alias.clone(), arg))
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()
                    .map(Arg::Map),
                SpecEntry::Positional => match take_default(position) {
                    Some(arg) => Ok(arg),
                    None => self.missing(InjectorError::missing_argument(position)),
                },
            })
            .collect()
    }

    /// Apply the missing policy to something that resolved to nothing
    fn missing(&self, err: InjectorError) -> Result<Arg, InjectorError> {
        if self.config.is_strict() {
            tracing::debug!(error = %err, "resolution failed");
            return Err(err);
        }
        tracing::trace!(error = %err, "resolved to missing");
        Ok(Arg::Missing)
    }

    /// Wrap `f` so its arguments are resolved from this registry by `spec`
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use injector::{args, spec, Args, InjectorError, Registry};
    ///
    /// let registry = Registry::new();
    /// registry.set("dep1", 42);
    ///
    /// let wrapped = registry.inject(
    ///     |args: Args| -> Result<i32, InjectorError> { Ok(*args.extract::<Arc<i32>>(0)?) },
    ///     spec!["dep1"],
    /// );
    /// assert_eq!(wrapped.call(args![]), Ok(42));
    /// ```
    pub fn inject<F>(&self, f: F, spec: impl Into<InjectionSpec>) -> Injected<F> {
        let spec = spec.into();
        tracing::debug!(dependencies = ?spec.dependency_names(), "wrapping function for injection");
        Injected::explicit(f, spec, self.clone())
    }

    /// Wrap `f`, deriving its spec from the parameter names in `source`
    ///
    /// `source` is the text of the function's declaration. It is parsed on the
    /// first call; a declaration that cannot be parsed makes every call fail
    /// with [`InjectorError::UnrecognizedSignature`].
    pub fn inject_parsed<F>(&self, f: F, source: impl Into<String>) -> Injected<F> {
        Injected::parsed(f, source.into(), self.clone())
    }

    /// Wrap a function annotated with `#[injectable]`
    pub fn inject_injectable<I: Injectable>(
        &self,
    ) -> Injected<fn(Args) -> Result<I::Output, InjectorError>> {
        self.inject(I::invoke as fn(Args) -> Result<I::Output, InjectorError>, I::dependencies())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("dependencies", &self.names())
            .field("config", &self.config)
            .finish()
    }
}
