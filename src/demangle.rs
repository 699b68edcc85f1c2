//! Human-readable type names.
//!
//! `std::any::type_name` yields fully qualified paths such as
//! `alloc::vec::Vec<alloc::string::String>`. This module strips the module
//! part of every path while keeping the shape of the type intact.

/// Shortens every path inside a raw type name to its last segment.
///
/// Generic arguments, tuples, arrays, slices, references, raw pointers,
/// `dyn` bounds and `fn` signatures keep their shape. Qualified paths such
/// as `<T as Trait>::Output` keep their `::`-prefixed tail.
///
/// Returns `None` when the name is not well formed (unbalanced `<>`, `()`
/// or `[]`) or empty.
///
/// # Examples
///
/// ```
/// use sovran_variant::pretty_type_name;
///
/// assert_eq!(
///     pretty_type_name("core::option::Option<alloc::string::String>").as_deref(),
///     Some("Option<String>")
/// );
/// assert_eq!(pretty_type_name("Vec<i32"), None);
/// ```
pub fn pretty_type_name(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut path = String::new();
    let mut open: Vec<char> = Vec::new();

    for c in raw.chars() {
        if is_path_char(c) {
            path.push(c);
            continue;
        }
        push_last_segment(&mut out, &path);
        path.clear();

        match c {
            '<' | '(' | '[' => open.push(c),
            // `->` in a fn signature is not a closing bracket
            '>' if out.ends_with('-') => {}
            '>' | ')' | ']' => {
                let expected = match c {
                    '>' => '<',
                    ')' => '(',
                    _ => '[',
                };
                if open.pop() != Some(expected) {
                    return None;
                }
            }
            _ => {}
        }
        out.push(c);
    }
    push_last_segment(&mut out, &path);

    if !open.is_empty() || out.is_empty() {
        return None;
    }
    Some(out)
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '{' | '}' | '\'')
}

fn push_last_segment(out: &mut String, path: &str) {
    let last = path.rsplit("::").next().unwrap_or(path);
    if path.starts_with("::") {
        out.push_str("::");
    }
    out.push_str(last);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(raw: &str) -> Option<String> {
        pretty_type_name(raw)
    }

    #[test]
    fn test_primitives_are_unchanged() {
        assert_eq!(pretty("i32").as_deref(), Some("i32"));
        assert_eq!(pretty("[u8; 4]").as_deref(), Some("[u8; 4]"));
        assert_eq!(pretty("&str").as_deref(), Some("&str"));
        assert_eq!(pretty("()").as_deref(), Some("()"));
    }

    #[test]
    fn test_paths_are_shortened() {
        assert_eq!(pretty("alloc::string::String").as_deref(), Some("String"));
        assert_eq!(
            pretty("std::collections::hash::map::HashMap<alloc::string::String, i32>").as_deref(),
            Some("HashMap<String, i32>")
        );
        assert_eq!(
            pretty("(i32, alloc::vec::Vec<alloc::string::String>)").as_deref(),
            Some("(i32, Vec<String>)")
        );
        assert_eq!(
            pretty("*mut alloc::string::String").as_deref(),
            Some("*mut String")
        );
        assert_eq!(
            pretty("&dyn core::fmt::Debug + core::marker::Send").as_deref(),
            Some("&dyn Debug + Send")
        );
    }

    #[test]
    fn test_fn_signatures_keep_arrow() {
        assert_eq!(
            pretty("fn(i32, &str) -> alloc::string::String").as_deref(),
            Some("fn(i32, &str) -> String")
        );
        assert_eq!(
            pretty("alloc::boxed::Box<dyn core::ops::function::Fn() -> i32>").as_deref(),
            Some("Box<dyn Fn() -> i32>")
        );
    }

    #[test]
    fn test_qualified_paths_keep_tail() {
        assert_eq!(
            pretty("<my_crate::Thing as core::iter::Iterator>::Item").as_deref(),
            Some("<Thing as Iterator>::Item")
        );
    }

    #[test]
    fn test_closure_names() {
        assert_eq!(
            pretty("my_crate::main::{{closure}}").as_deref(),
            Some("{{closure}}")
        );
    }

    #[test]
    fn test_malformed_names_fail() {
        assert_eq!(pretty(""), None);
        assert_eq!(pretty("Vec<i32"), None);
        assert_eq!(pretty("Vec>i32"), None);
        assert_eq!(pretty("(i32, u8]"), None);
    }

    #[test]
    fn test_real_type_names() {
        assert_eq!(
            pretty(std::any::type_name::<Vec<String>>()).as_deref(),
            Some("Vec<String>")
        );
        assert_eq!(
            pretty(std::any::type_name::<Option<Box<u8>>>()).as_deref(),
            Some("Option<Box<u8>>")
        );
    }
}
