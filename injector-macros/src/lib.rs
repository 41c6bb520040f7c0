//! Procedural macros for the injector crate
//!
//! This crate provides compile-time dependency declarations for functions:
//! - `#[injectable]` derives a function's injection spec from its parameter names

use proc_macro::TokenStream;

mod injectable;

/// Derive an injection spec for a free function from its parameter names
///
/// Each parameter is resolved by its own name unless annotated:
///
/// - `#[inject("name")]` resolves the parameter from a different dependency name
/// - `#[positional]` takes the caller's argument at that position
///
/// Parameter types must implement `FromArg` (`Arc<T>`, `Option<Arc<T>>`,
/// `Dependency` or `Arg`). A unit struct named `<FunctionName>Injectable`
/// implementing `Injectable` is generated next to the function; pass
/// `name = Ident` to choose another name.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use injector::{args, injectable, Registry};
///
/// #[injectable]
/// fn greet(greeting: Arc<String>, #[positional] name: Arc<&'static str>) -> String {
///     format!("{} {}", greeting, name)
/// }
///
/// let registry = Registry::new();
/// registry.set("greeting", String::from("hello"));
///
/// let greet = registry.inject_injectable::<GreetInjectable>();
/// assert_eq!(greet.call(args!["world"]).unwrap(), "hello world");
/// ```
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(attr, input)
}
