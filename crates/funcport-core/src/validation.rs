//! Test-form input validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::test_data::NameValuePair;

/// Header the platform injects itself; user-supplied copies are rejected.
pub const FUNCTIONS_KEY_HEADER: &str = "x-functions-key";

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\-_]+$").expect("valid regex"))
}

/// A query row is valid when the name is a simple token and the value is
/// non-empty.
pub fn is_valid_query(query: &NameValuePair) -> bool {
    name_re().is_match(&query.name) && !query.value.is_empty()
}

/// A header row is valid when the name is a simple token, the value is
/// non-empty, and the name is not reserved.
pub fn is_valid_header(header: &NameValuePair) -> bool {
    name_re().is_match(&header.name)
        && !header.value.is_empty()
        && !is_reserved_header(&header.name)
}

pub fn is_reserved_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(FUNCTIONS_KEY_HEADER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_query() {
        assert!(is_valid_query(&NameValuePair::new("id", "5")));
        assert!(is_valid_query(&NameValuePair::new("trace-id", "abc")));
        assert!(is_valid_query(&NameValuePair::new("snake_case", "x")));
    }

    #[test]
    fn test_query_rejects_empty_value() {
        assert!(!is_valid_query(&NameValuePair::new("id", "")));
    }

    #[test]
    fn test_query_rejects_bad_name() {
        assert!(!is_valid_query(&NameValuePair::new("a b", "1")));
        assert!(!is_valid_query(&NameValuePair::new("", "1")));
        assert!(!is_valid_query(&NameValuePair::new("a=b", "1")));
    }

    #[test]
    fn test_header_rejects_functions_key() {
        assert!(!is_valid_header(&NameValuePair::new("x-functions-key", "k")));
        assert!(!is_valid_header(&NameValuePair::new("X-Functions-Key", "k")));
        assert!(is_valid_header(&NameValuePair::new("x-custom", "k")));
    }

    #[test]
    fn test_reserved_header_check() {
        assert!(is_reserved_header("x-functions-key"));
        assert!(is_reserved_header("X-FUNCTIONS-KEY"));
        assert!(!is_reserved_header("content-type"));
    }
}
