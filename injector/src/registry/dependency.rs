//! Type-erased dependency values and resolved arguments

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::InjectorError;

/// A type-erased, shared dependency value
///
/// Cloning is cheap and keeps pointer identity, so a value read back from a
/// registry is the very value that was stored.
#[derive(Clone)]
pub struct Dependency {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Dependency {
    /// Wrap a value
    ///
    /// Passing a `Dependency` returns it unchanged instead of nesting it.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<Dependency>() {
            Ok(dependency) => *dependency,
            Err(boxed) => Self {
                value: Arc::from(boxed),
                type_name: std::any::type_name::<T>(),
            },
        }
    }

    /// Wrap a value that is already shared
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Name of the type the value was created from
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether the value holds a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Get a shared handle to the value as `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    /// Check whether two dependencies are the same stored value
    pub fn ptr_eq(a: &Dependency, b: &Dependency) -> bool {
        Arc::ptr_eq(&a.value, &b.value)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency<{}>", self.type_name)
    }
}

/// One resolved argument handed to a wrapped function
#[derive(Debug, Clone)]
pub enum Arg {
    /// Nothing was found and no caller argument filled the slot
    Missing,
    /// A single value
    Value(Dependency),
    /// A destructured request: alias → resolved argument
    Map(BTreeMap<String, Arg>),
}

impl Arg {
    /// Wrap a plain value as an argument
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Dependency::new(value))
    }

    /// Check whether the slot is empty
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The underlying value, if this is a single value
    pub fn dependency(&self) -> Option<&Dependency> {
        match self {
            Self::Value(dependency) => Some(dependency),
            _ => None,
        }
    }

    /// Borrow a single value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.dependency()?.downcast_ref::<T>()
    }

    /// The alias map, if this is a destructured request
    pub fn as_map(&self) -> Option<&BTreeMap<String, Arg>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up one alias of a destructured request
    pub fn field(&self, alias: &str) -> Option<&Arg> {
        self.as_map()?.get(alias)
    }
}

impl From<Dependency> for Arg {
    fn from(dependency: Dependency) -> Self {
        Self::Value(dependency)
    }
}

impl From<Option<Dependency>> for Arg {
    fn from(dependency: Option<Dependency>) -> Self {
        dependency.map_or(Self::Missing, Self::Value)
    }
}

/// Build a `Vec<Arg>` of caller arguments from plain values
///
/// # Example
/// ```rust
/// let args = injector::args![10, "twenty".to_string()];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::value($value)),+]
    };
}

/// Conversion from a resolved argument into a typed parameter
///
/// Implemented for the parameter types an `#[injectable]` function may declare.
pub trait FromArg: Sized {
    /// Convert the argument at `position`
    fn from_arg(arg: &Arg, position: usize) -> Result<Self, InjectorError>;
}

impl<T: Any + Send + Sync> FromArg for Arc<T> {
    fn from_arg(arg: &Arg, position: usize) -> Result<Self, InjectorError> {
        match arg {
            Arg::Missing => Err(InjectorError::missing_argument(position)),
            Arg::Value(dependency) => dependency.downcast::<T>().ok_or_else(|| {
                InjectorError::type_mismatch::<T>(
                    format!("argument {}", position),
                    dependency.type_name(),
                )
            }),
            Arg::Map(_) => Err(InjectorError::type_mismatch::<T>(
                format!("argument {}", position),
                "destructured map",
            )),
        }
    }
}

impl<T: Any + Send + Sync> FromArg for Option<Arc<T>> {
    fn from_arg(arg: &Arg, position: usize) -> Result<Self, InjectorError> {
        match arg {
            Arg::Missing => Ok(None),
            _ => Arc::<T>::from_arg(arg, position).map(Some),
        }
    }
}

impl FromArg for Dependency {
    fn from_arg(arg: &Arg, position: usize) -> Result<Self, InjectorError> {
        match arg {
            Arg::Value(dependency) => Ok(dependency.clone()),
            Arg::Missing => Err(InjectorError::missing_argument(position)),
            Arg::Map(_) => Err(InjectorError::type_mismatch::<Dependency>(
                format!("argument {}", position),
                "destructured map",
            )),
        }
    }
}

impl FromArg for Arg {
    fn from_arg(arg: &Arg, _position: usize) -> Result<Self, InjectorError> {
        Ok(arg.clone())
    }
}

/// The resolved argument list a wrapped function receives
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    /// Wrap an already resolved list
    pub fn new(args: Vec<Arg>) -> Self {
        Self(args)
    }

    /// Extract the argument at `position` as a typed parameter
    ///
    /// Positions past the end behave like [`Arg::Missing`].
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use injector::{args, Args};
    ///
    /// let args = Args::new(args![5u32]);
    /// let n: Arc<u32> = args.extract(0).unwrap();
    /// assert_eq!(*n, 5);
    /// assert!(args.extract::<Option<Arc<u32>>>(1).unwrap().is_none());
    /// ```
    pub fn extract<T: FromArg>(&self, position: usize) -> Result<T, InjectorError> {
        match self.0.get(position) {
            Some(arg) => T::from_arg(arg, position),
            None => T::from_arg(&Arg::Missing, position),
        }
    }

    /// Unwrap into the plain list
    pub fn into_vec(self) -> Vec<Arg> {
        self.0
    }
}

impl Deref for Args {
    type Target = [Arg];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Self(args)
    }
}

impl IntoIterator for Args {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_keeps_type_name() {
        let dep = Dependency::new(42u64);
        assert_eq!(dep.type_name(), "u64");
        assert!(dep.is::<u64>());
        assert!(!dep.is::<u32>());
        assert_eq!(dep.downcast_ref::<u64>(), Some(&42));
    }

    #[test]
    fn test_dependency_is_not_nested() {
        let dep = Dependency::new(String::from("db"));
        let again = Dependency::new(dep.clone());

        assert!(Dependency::ptr_eq(&dep, &again));
        assert!(again.is::<String>());
    }

    #[test]
    fn test_from_arc_shares_allocation() {
        let shared = Arc::new(vec![1, 2, 3]);
        let dep = Dependency::from_arc(shared.clone());
        let back = dep.downcast::<Vec<i32>>().unwrap();
        assert!(Arc::ptr_eq(&shared, &back));
    }

    #[test]
    fn test_arg_field_lookup() {
        let mut map = BTreeMap::new();
        map.insert("port".to_string(), Arg::value(8080u16));
        let arg = Arg::Map(map);

        assert_eq!(
            arg.field("port").and_then(|a| a.downcast_ref::<u16>()),
            Some(&8080)
        );
        assert!(arg.field("host").is_none());
        assert!(arg.dependency().is_none());
    }

    #[test]
    fn test_extract_reports_type_mismatch() {
        let args = Args::new(args!["text"]);
        let err = args.extract::<Arc<u32>>(0).unwrap_err();
        assert!(matches!(err, InjectorError::TypeMismatch { .. }));
    }

    #[test]
    fn test_extract_past_end_is_missing() {
        let args = Args::new(args![]);
        assert_eq!(
            args.extract::<Arc<u32>>(3).unwrap_err(),
            InjectorError::missing_argument(3)
        );
        assert!(args.extract::<Arg>(3).unwrap().is_missing());
    }

    #[test]
    fn test_option_accepts_missing() {
        let args = Args::new(vec![Arg::Missing, Arg::value(1u8)]);
        assert!(args.extract::<Option<Arc<u8>>>(0).unwrap().is_none());
        assert_eq!(args.extract::<Option<Arc<u8>>>(1).unwrap().as_deref(), Some(&1));
    }
}
