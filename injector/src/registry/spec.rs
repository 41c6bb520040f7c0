//! Injection specs: how each argument of a wrapped function is resolved

use std::collections::BTreeMap;

/// One position of an injection spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecEntry {
    /// Look the name up in the registry, falling back to the caller's argument
    Name(String),
    /// Resolve every alias → name pair into a map of values
    Destructure(BTreeMap<String, String>),
    /// Always take the caller's argument at this position
    Positional,
}

impl SpecEntry {
    /// Create a name entry
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Create a destructuring entry from alias → dependency name pairs
    ///
    /// # Example
    /// ```rust
    /// use injector::SpecEntry;
    ///
    /// let entry = SpecEntry::destructure([("db", "database"), ("log", "logger")]);
    /// ```
    pub fn destructure<I, A, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, N)>,
        A: Into<String>,
        N: Into<String>,
    {
        Self::Destructure(
            pairs
                .into_iter()
                .map(|(alias, name)| (alias.into(), name.into()))
                .collect(),
        )
    }
}

impl From<&str> for SpecEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SpecEntry {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// `None` is the positional marker
impl<T: Into<SpecEntry>> From<Option<T>> for SpecEntry {
    fn from(entry: Option<T>) -> Self {
        entry.map_or(Self::Positional, Into::into)
    }
}

/// Ordered description of a wrapped function's arguments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectionSpec {
    entries: Vec<SpecEntry>,
}

impl InjectionSpec {
    /// Create an empty spec (the wrapped function receives the caller's arguments verbatim)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a spec of plain names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|n| SpecEntry::Name(n.into())).collect()
    }

    /// Append a name entry
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entries.push(SpecEntry::name(name));
        self
    }

    /// Append a positional entry
    pub fn positional(mut self) -> Self {
        self.entries.push(SpecEntry::Positional);
        self
    }

    /// Append a destructuring entry
    pub fn destructure<I, A, N>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, N)>,
        A: Into<String>,
        N: Into<String>,
    {
        self.entries.push(SpecEntry::destructure(pairs));
        self
    }

    /// The entries in order
    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    /// Number of entries, and so of resolved arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the spec has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every dependency name the spec refers to, in order of appearance
    pub fn dependency_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|entry| match entry {
                SpecEntry::Name(name) => vec![name.as_str()],
                SpecEntry::Destructure(map) => map.values().map(String::as_str).collect(),
                SpecEntry::Positional => Vec::new(),
            })
            .collect()
    }
}

impl FromIterator<SpecEntry> for InjectionSpec {
    fn from_iter<I: IntoIterator<Item = SpecEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<SpecEntry>> for InjectionSpec {
    fn from(entries: Vec<SpecEntry>) -> Self {
        Self { entries }
    }
}

impl From<&[&str]> for InjectionSpec {
    fn from(names: &[&str]) -> Self {
        Self::from_names(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for InjectionSpec {
    fn from(names: [&str; N]) -> Self {
        Self::from_names(names)
    }
}

impl From<Vec<String>> for InjectionSpec {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

/// Build an [`InjectionSpec`] inline
///
/// Each entry is a dependency name, `null` for the positional marker, or
/// `{ alias => "name", ... }` for a destructuring request.
///
/// # Example
/// ```rust
/// use injector::{spec, SpecEntry};
///
/// let spec = spec!["db", null, { cfg => "config" }];
/// assert_eq!(spec.entries()[1], SpecEntry::Positional);
/// ```
#[macro_export]
macro_rules! spec {
    () => {
        $crate::InjectionSpec::new()
    };
    (@entry null) => {
        $crate::SpecEntry::Positional
    };
    (@entry { $($alias:ident => $name:expr),* $(,)? }) => {
        $crate::SpecEntry::destructure([$((stringify!($alias), $name)),*])
    };
    (@entry $name:expr) => {
        $crate::SpecEntry::from($name)
    };
    ($($entry:tt),* $(,)?) => {
        $crate::InjectionSpec::from(::std::vec![$($crate::spec!(@entry $entry)),*])
    };
}
