//! Parameter-name extraction from function source text
//!
//! Derives an injection spec from the textual declaration of a function when
//! no explicit spec is given. Both `function name(a, b)` headers and Rust
//! `fn name(a: A, b: B)` headers are recognized; the first header in the text
//! wins. Comments are stripped before matching, so commented-out parameters
//! never become dependencies.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::InjectorError;

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("comment pattern is valid")
    })
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:function|fn)\b\s*\*?\s*(?:[A-Za-z_$][\w$]*)?\s*")
            .expect("header pattern is valid")
    })
}

/// Remove `//` line comments and `/* */` block comments
pub fn strip_comments(source: &str) -> String {
    comment_pattern().replace_all(source, "").into_owned()
}

/// Extract the declared parameter names of the first function header in `source`
///
/// # Errors
///
/// Returns [`InjectorError::UnrecognizedSignature`] when no header is found
/// or its parameter list is never closed.
///
/// # Example
///
/// ```rust
/// use injector::signature::parse_param_names;
///
/// let names = parse_param_names("function (a, b, c) {}").unwrap();
/// assert_eq!(names, vec!["a", "b", "c"]);
/// ```
pub fn parse_param_names(source: &str) -> Result<Vec<String>, InjectorError> {
    let stripped = strip_comments(source);
    let list = header_pattern()
        .find_iter(&stripped)
        .find_map(|header| {
            let rest = skip_generics(&stripped[header.end()..])?;
            rest.trim_start().strip_prefix('(')
        })
        .and_then(parameter_list)
        .ok_or_else(|| InjectorError::unrecognized_signature(source))?;

    Ok(split_top_level(list)
        .into_iter()
        .filter_map(binding_name)
        .collect())
}

/// Skip a leading `<...>` generics list, which may itself contain parentheses
fn skip_generics(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    if !rest.starts_with('<') {
        return Some(rest);
    }

    let mut depth = 0usize;
    let mut prev = '\0';
    for (idx, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if is_arrow(prev) => {}
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[idx + 1..]);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// `->` and `=>` end in a `>` that closes nothing
fn is_arrow(prev: char) -> bool {
    prev == '-' || prev == '='
}

/// Text up to the parenthesis closing the list that starts right before `rest`
fn parameter_list(rest: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(&rest[..idx]),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside brackets
fn split_top_level(list: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';
    for (idx, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' if is_arrow(prev) => {}
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        prev = c;
    }
    pieces.push(&list[start..]);
    pieces
}

/// The bound name of one parameter, if it binds a plain name
///
/// `a`, `a = 1`, `a: Type` and `mut a: Type` yield `a`; receivers and empty
/// pieces yield nothing. Whitespace is removed from the result.
fn binding_name(piece: &str) -> Option<String> {
    let head = piece.split([':', '=']).next().unwrap_or_default().trim();
    let head = head.trim_start_matches('&').trim_start();
    let head = head
        .strip_prefix("mut")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(head, str::trim_start);

    let name: String = head.chars().filter(|c| !c.is_whitespace()).collect();
    if name.is_empty() || name == "self" {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anonymous_function_header() {
        let names = parse_param_names("function (a, b, c) {}").unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_named_function_with_whitespace() {
        let names = parse_param_names("function handler(\n  req,\n\tres ,next\n) { return 1 }").unwrap();
        assert_eq!(names, vec!["req", "res", "next"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let source = "function (db /* the database */, // trailing note\n  logger /*, cache */) {}";
        let names = parse_param_names(source).unwrap();
        assert_eq!(names, vec!["db", "logger"]);
    }

    #[test]
    fn test_commented_out_header_is_ignored() {
        let source = "// function old(x) {}\nfunction current(y) {}";
        assert_eq!(parse_param_names(source).unwrap(), vec!["y"]);
    }

    #[test]
    fn test_empty_parameter_list() {
        assert!(parse_param_names("function () {}").unwrap().is_empty());
    }

    #[test]
    fn test_rust_signature_keeps_binding_names() {
        let source = "pub fn handle(&self, mut db: Arc<Db>, pool: HashMap<String, Conn>, retries: u8) -> Result<(), E>";
        let names = parse_param_names(source).unwrap();
        assert_eq!(names, vec!["db", "pool", "retries"]);
    }

    #[test]
    fn test_rust_generic_signature() {
        let source = "fn build<T: Clone, U>(left: T, right: U) {}";
        assert_eq!(parse_param_names(source).unwrap(), vec!["left", "right"]);
    }

    #[test]
    fn test_rust_generic_bounds_with_parentheses() {
        let source = "fn apply<F: Fn(u8) -> u8>(cb: F, value: u8) -> u8 { cb(value) }";
        assert_eq!(parse_param_names(source).unwrap(), vec!["cb", "value"]);
    }

    #[test]
    fn test_closure_type_does_not_swallow_later_params() {
        let names = parse_param_names("fn f(cb: impl Fn(u8) -> u8, x: u8) {}").unwrap();
        assert_eq!(names, vec!["cb", "x"]);
    }

    #[test]
    fn test_arrow_default_does_not_swallow_later_params() {
        let names = parse_param_names("function (a = () => 1, b) {}").unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_stray_closing_bracket_keeps_splitting() {
        assert_eq!(split_top_level("a > 1, b, c"), vec!["a > 1", " b", " c"]);
    }

    #[test]
    fn test_default_values_are_dropped() {
        let names = parse_param_names("function (a = 1, b) {}").unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_arrow_function_is_rejected() {
        let err = parse_param_names("(a, b) => a + b").unwrap_err();
        assert!(matches!(err, InjectorError::UnrecognizedSignature { .. }));
    }

    #[test]
    fn test_unclosed_list_is_rejected() {
        assert!(parse_param_names("function (a, b").is_err());
    }

    #[test]
    fn test_strip_comments_multiline_block() {
        let stripped = strip_comments("a /* one\n two */ b // three\nc");
        assert_eq!(stripped, "a  b \nc");
    }
}
