//! Injection-wrapped functions
//!
//! An [`Injected`] keeps the original callable, the spec describing its
//! arguments and the registry that created it. Invoking it resolves the spec
//! against a registry and hands the resolved [`Args`] to the original.
//!
//! The registry used for resolution is chosen per call:
//!
//! - [`Injected::call`] uses the registry that created the wrapper
//! - [`Injected::call_with`] takes an explicit override
//! - [`Injected::call_on`] asks a [`RegistryContext`] (an object that may
//!   carry its own registry) and falls back to the creating registry

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::dependency::Args;
use super::spec::InjectionSpec;
use super::{Arg, Registry};
use crate::error::InjectorError;
use crate::signature;

/// Something that may carry the registry a wrapped function should resolve against
///
/// # Example
///
/// ```rust
/// use injector::{Registry, RegistryContext};
///
/// struct RequestScope {
///     registry: Registry,
/// }
///
/// impl RegistryContext for RequestScope {
///     fn registry(&self) -> Option<&Registry> {
///         Some(&self.registry)
///     }
/// }
/// ```
pub trait RegistryContext {
    /// The registry to resolve against, or `None` to use the wrapper's own
    fn registry(&self) -> Option<&Registry>;
}

impl RegistryContext for Registry {
    fn registry(&self) -> Option<&Registry> {
        Some(self)
    }
}

impl<C: RegistryContext> RegistryContext for Option<C> {
    fn registry(&self) -> Option<&Registry> {
        self.as_ref()?.registry()
    }
}

/// A function whose dependency names are known at compile time
///
/// Implemented by the unit structs `#[injectable]` generates.
pub trait Injectable {
    /// Return type of the annotated function
    type Output;

    /// The spec derived from the function's parameters
    fn dependencies() -> InjectionSpec;

    /// Convert resolved arguments into parameters and call the function
    fn invoke(args: Args) -> Result<Self::Output, InjectorError>;
}

/// Where a wrapper's spec comes from
#[derive(Clone)]
enum SpecSource {
    Explicit(InjectionSpec),
    /// Parsed from source text on first use
    Parsed {
        source: String,
        parsed: OnceLock<InjectionSpec>,
    },
}

/// A function wrapped for dependency injection
///
/// `F` receives the resolved [`Args`] and returns `Result<R, E>`; resolution
/// failures are converted into `E`.
pub struct Injected<F> {
    original: Arc<F>,
    spec: SpecSource,
    registry: Registry,
}

impl<F> Injected<F> {
    pub(super) fn explicit(original: F, spec: InjectionSpec, registry: Registry) -> Self {
        Self {
            original: Arc::new(original),
            spec: SpecSource::Explicit(spec),
            registry,
        }
    }

    pub(super) fn parsed(original: F, source: String, registry: Registry) -> Self {
        Self {
            original: Arc::new(original),
            spec: SpecSource::Parsed {
                source,
                parsed: OnceLock::new(),
            },
            registry,
        }
    }

    /// The wrapped function
    pub fn original(&self) -> &F {
        &self.original
    }

    /// The registry that created this wrapper
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The injection spec, deriving it from source text on first use
    pub fn spec(&self) -> Result<&InjectionSpec, InjectorError> {
        match &self.spec {
            SpecSource::Explicit(spec) => Ok(spec),
            SpecSource::Parsed { source, parsed } => {
                if let Some(spec) = parsed.get() {
                    return Ok(spec);
                }
                if !self.registry.config().parse_signatures {
                    return Err(InjectorError::SignatureParsingDisabled);
                }
                let names = signature::parse_param_names(source).inspect_err(|err| {
                    tracing::warn!(error = %err, "could not derive dependency names from signature");
                })?;
                tracing::debug!(names = ?names, "derived dependency names from signature");
                Ok(parsed.get_or_init(|| InjectionSpec::from_names(names)))
            }
        }
    }

    /// Resolve the arguments the original would receive, without calling it
    pub fn resolve_args(
        &self,
        registry: Option<&Registry>,
        args: Vec<Arg>,
    ) -> Result<Vec<Arg>, InjectorError> {
        let registry = registry.unwrap_or(&self.registry);
        registry.get_all(self.spec()?, args)
    }

    /// Call with the caller's positional arguments, resolving against the creating registry
    pub fn call<R, E>(&self, args: Vec<Arg>) -> Result<R, E>
    where
        F: Fn(Args) -> Result<R, E>,
        E: From<InjectorError>,
    {
        self.call_with(None, args)
    }

    /// Call, resolving against `registry` when given
    pub fn call_with<R, E>(&self, registry: Option<&Registry>, args: Vec<Arg>) -> Result<R, E>
    where
        F: Fn(Args) -> Result<R, E>,
        E: From<InjectorError>,
    {
        let resolved = self.resolve_args(registry, args)?;
        (*self.original)(Args::new(resolved))
    }

    /// Call, resolving against the registry `context` carries
    pub fn call_on<C, R, E>(&self, context: &C, args: Vec<Arg>) -> Result<R, E>
    where
        C: RegistryContext + ?Sized,
        F: Fn(Args) -> Result<R, E>,
        E: From<InjectorError>,
    {
        self.call_with(context.registry(), args)
    }
}

impl<F> Clone for Injected<F> {
    fn clone(&self) -> Self {
        Self {
            original: Arc::clone(&self.original),
            spec: self.spec.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<F> fmt::Debug for Injected<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Injected");
        match &self.spec {
            SpecSource::Explicit(spec) => debug.field("spec", spec),
            SpecSource::Parsed { source, parsed } => debug
                .field("source", source)
                .field("spec", &parsed.get()),
        };
        debug
            .field("original", &std::any::type_name::<F>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{args, spec, InjectorConfig};

    fn first_u32(args: Args) -> Result<u32, InjectorError> {
        let value: Arc<u32> = args.extract(0)?;
        Ok(*value)
    }

    #[test]
    fn test_call_resolves_named_dependency() {
        let registry = Registry::new();
        registry.set("dep1", 42u32);

        let wrapped = registry.inject(first_u32, spec!["dep1"]);
        assert_eq!(wrapped.call(args![]), Ok(42));
    }

    #[test]
    fn test_call_falls_back_to_positional_argument() {
        let registry = Registry::new();
        let wrapped = registry.inject(first_u32, spec!["dep1"]);

        assert_eq!(wrapped.call(args![7u32]), Ok(7));
    }

    #[test]
    fn test_wrapper_sees_later_registrations() {
        let registry = Registry::new();
        let wrapped = registry.inject(first_u32, spec!["dep1"]);
        registry.set("dep1", 9u32);

        assert_eq!(wrapped.call(args![]), Ok(9));
    }

    #[test]
    fn test_call_with_override_registry() {
        let own = Registry::new();
        own.set("dep1", 1u32);
        let other = Registry::new();
        other.set("dep1", 2u32);

        let wrapped = own.inject(first_u32, spec!["dep1"]);
        assert_eq!(wrapped.call_with(Some(&other), args![]), Ok(2));
        assert_eq!(wrapped.call_with(None, args![]), Ok(1));
    }

    struct Scope {
        registry: Option<Registry>,
    }

    impl RegistryContext for Scope {
        fn registry(&self) -> Option<&Registry> {
            self.registry.as_ref()
        }
    }

    #[test]
    fn test_call_on_context() {
        let own = Registry::new();
        own.set("dep1", 1u32);
        let scoped = Registry::new();
        scoped.set("dep1", 3u32);
        let wrapped = own.inject(first_u32, spec!["dep1"]);

        let with_registry = Scope {
            registry: Some(scoped.clone()),
        };
        let without_registry = Scope { registry: None };

        assert_eq!(wrapped.call_on(&with_registry, args![]), Ok(3));
        assert_eq!(wrapped.call_on(&without_registry, args![]), Ok(1));
        assert_eq!(wrapped.call_on(&scoped, args![]), Ok(3));
    }

    #[test]
    fn test_parsed_spec_is_derived_once() {
        let registry = Registry::new();
        registry.set_all([("a", 1u32), ("b", 2u32)]);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let wrapped = registry.inject_parsed(
            move |args: Args| -> Result<u32, InjectorError> {
                counter.fetch_add(1, Ordering::SeqCst);
                let a: Arc<u32> = args.extract(0)?;
                let b: Arc<u32> = args.extract(1)?;
                Ok(*a + *b)
            },
            "function (a, /* unused */ b) {}",
        );

        assert_eq!(wrapped.call(args![]), Ok(3));
        assert_eq!(wrapped.call(args![]), Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(wrapped.spec().unwrap(), &spec!["a", "b"]);
    }

    #[test]
    fn test_unparsable_signature_fails_on_call() {
        let registry = Registry::new();
        let wrapped = registry.inject_parsed(first_u32, "(a) => a");

        let err = wrapped.call(args![]).unwrap_err();
        assert!(matches!(err, InjectorError::UnrecognizedSignature { .. }));
    }

    #[test]
    fn test_parsing_disabled_by_config() {
        let registry = Registry::with_config(
            InjectorConfig::builder().parse_signatures(false).build(),
        );
        let wrapped = registry.inject_parsed(first_u32, "function (a) {}");

        assert_eq!(
            wrapped.call(args![]),
            Err(InjectorError::SignatureParsingDisabled)
        );
    }

    #[test]
    fn test_original_is_inspectable() {
        let registry = Registry::new();
        let wrapped = registry.inject(first_u32, spec![null]);

        let direct = (wrapped.original())(Args::new(args![5u32]));
        assert_eq!(direct, Ok(5));
    }

    #[test]
    fn test_user_error_type_receives_resolution_errors() {
        #[derive(Debug, PartialEq)]
        enum AppError {
            Injection(InjectorError),
        }

        impl From<InjectorError> for AppError {
            fn from(err: InjectorError) -> Self {
                Self::Injection(err)
            }
        }

        let registry = Registry::with_config(InjectorConfig::builder().strict().build());
        let wrapped = registry.inject(|_args: Args| Ok::<(), AppError>(()), spec!["db"]);

        assert_eq!(
            wrapped.call(args![]),
            Err(AppError::Injection(InjectorError::missing_dependency("db")))
        );
    }
}
