//! Fluent assertion API inspired by Jest's expect
//!
//! Provides a fluent API for assertions with clear expected/received output.

use std::fmt::Debug;

use crate::registry::Registry;

/// Format the assertion failure header
fn format_header(location: &str) -> String {
    format!("\nassertion failed at {}\n", location)
}

/// The main Expect wrapper for fluent assertions
pub struct Expect<T> {
    value: T,
    location: &'static str,
}

impl<T> Expect<T> {
    /// Create a new Expect wrapper (use the expect! macro instead)
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }
}

// Equality matchers for Debug + PartialEq types
impl<T: Debug + PartialEq> Expect<T> {
    /// Assert that the value equals the expected value
    ///
    /// # Example
    /// ```rust
    /// injector::expect!(1 + 1).to_equal(2);
    /// ```
    pub fn to_equal(&self, expected: T) {
        if self.value != expected {
            panic!(
                "{}\n  expect!(actual).to_equal(expected)\n\n  Expected: {:?}\n  Received: {:?}\n",
                format_header(self.location),
                expected,
                self.value
            );
        }
    }

    /// Assert that the value does not equal the unexpected value
    pub fn to_not_equal(&self, unexpected: T) {
        if self.value == unexpected {
            panic!(
                "{}\n  expect!(actual).to_not_equal(value)\n\n  Expected NOT: {:?}\n  Received: {:?}\n",
                format_header(self.location),
                unexpected,
                self.value
            );
        }
    }
}

// Boolean matchers
impl Expect<bool> {
    /// Assert that the value is true
    pub fn to_be_true(&self) {
        if !self.value {
            panic!(
                "{}\n  expect!(value).to_be_true()\n\n  Expected: true\n  Received: false\n",
                format_header(self.location)
            );
        }
    }

    /// Assert that the value is false
    pub fn to_be_false(&self) {
        if self.value {
            panic!(
                "{}\n  expect!(value).to_be_false()\n\n  Expected: false\n  Received: true\n",
                format_header(self.location)
            );
        }
    }
}

// Option matchers
impl<T: Debug> Expect<Option<T>> {
    /// Assert that the Option is Some, returning the inner value
    pub fn to_be_some(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => panic!(
                "{}\n  expect!(option).to_be_some()\n\n  Expected: Some(_)\n  Received: None\n",
                format_header(self.location)
            ),
        }
    }

    /// Assert that the Option is None
    pub fn to_be_none(&self) {
        if let Some(ref v) = self.value {
            panic!(
                "{}\n  expect!(option).to_be_none()\n\n  Expected: None\n  Received: Some({:?})\n",
                format_header(self.location),
                v
            );
        }
    }
}

// Result matchers
impl<T: Debug, E: Debug> Expect<Result<T, E>> {
    /// Assert that the Result is Ok, returning the value
    ///
    /// # Example
    /// ```rust
    /// use injector::{args, expect, spec, Registry};
    ///
    /// let registry = Registry::new();
    /// let resolved = expect!(registry.get_all(&spec![null], args![1])).to_be_ok().len();
    /// assert_eq!(resolved, 1);
    /// ```
    pub fn to_be_ok(&self) -> &T {
        match &self.value {
            Ok(value) => value,
            Err(err) => panic!(
                "{}\n  expect!(result).to_be_ok()\n\n  Expected: Ok(_)\n  Received: Err({:?})\n",
                format_header(self.location),
                err
            ),
        }
    }

    /// Assert that the Result is Err
    pub fn to_be_err(&self) {
        if let Ok(ref v) = self.value {
            panic!(
                "{}\n  expect!(result).to_be_err()\n\n  Expected: Err(_)\n  Received: Ok({:?})\n",
                format_header(self.location),
                v
            );
        }
    }
}

// String matchers
impl Expect<String> {
    /// Assert that the string contains the substring
    pub fn to_contain(&self, substring: &str) {
        if !self.value.contains(substring) {
            panic!(
                "{}\n  expect!(string).to_contain(substring)\n\n  Expected to contain: {:?}\n  Received: {:?}\n",
                format_header(self.location),
                substring,
                self.value
            );
        }
    }
}

// Vec matchers
impl<T: Debug + PartialEq> Expect<Vec<T>> {
    /// Assert that the Vec has the expected length
    pub fn to_have_length(&self, expected: usize) {
        let actual = self.value.len();
        if actual != expected {
            panic!(
                "{}\n  expect!(vec).to_have_length({})\n\n  Expected length: {}\n  Actual length: {}\n",
                format_header(self.location),
                expected,
                expected,
                actual
            );
        }
    }

    /// Assert that the Vec contains the item
    pub fn to_contain(&self, item: &T) {
        if !self.value.contains(item) {
            panic!(
                "{}\n  expect!(vec).to_contain(item)\n\n  Expected to contain: {:?}\n  Received: {:?}\n",
                format_header(self.location),
                item,
                self.value
            );
        }
    }
}

// Registry matchers
impl Expect<&Registry> {
    /// Assert that the registry holds a dependency under `name`
    ///
    /// # Example
    /// ```rust
    /// use injector::{expect, Registry};
    ///
    /// let registry = Registry::new();
    /// registry.set("cache", 16usize);
    /// expect!(&registry).to_have_dependency("cache");
    /// ```
    pub fn to_have_dependency(&self, name: &str) {
        if !self.value.has(name) {
            panic!(
                "{}\n  expect!(registry).to_have_dependency({:?})\n\n  Expected: {:?}\n  Registered: {:?}\n",
                format_header(self.location),
                name,
                name,
                self.value.names()
            );
        }
    }

    /// Assert that the registry holds nothing under `name`
    pub fn to_not_have_dependency(&self, name: &str) {
        if let Some(dependency) = self.value.get(name) {
            panic!(
                "{}\n  expect!(registry).to_not_have_dependency({:?})\n\n  Expected: nothing\n  Received: {:?}\n",
                format_header(self.location),
                name,
                dependency
            );
        }
    }
}
