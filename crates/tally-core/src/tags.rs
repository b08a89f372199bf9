//! # Tag List Parser
//!
//! Turns whatever the merchant typed into a tag list.
//!
//! ```text
//! "vip, wholesale ,,b2b"     ──► ["vip", "wholesale", "b2b"]
//! ["vip", " wholesale "]     ──► ["vip", " wholesale "]   (passed through)
//! 42 / null / {..} / [1, "a"] ──► []
//! ```
//!
//! Strings are cleaned, string lists are trusted as-is. Duplicates are kept in
//! both cases.

use serde_json::Value;

/// Parses a raw tag input into an ordered tag list.
///
/// Never fails: anything that is not a string or a list of strings yields an
/// empty list.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_core::tags::parse_tags;
///
/// assert_eq!(parse_tags(&json!("a, b ,,c")), vec!["a", "b", "c"]);
/// assert!(parse_tags(&json!(42)).is_empty());
/// ```
pub fn parse_tags(input: &Value) -> Vec<String> {
    match input {
        Value::String(s) => split_tags(s),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Splits a comma separated tag string, trimming pieces and dropping empties.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if the value already has a tag-list shape: a string, or a list
/// whose every element is a string.
pub fn is_tag_input(input: &Value) -> bool {
    match input {
        Value::String(_) => true,
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tags_from_string() {
        assert_eq!(parse_tags(&json!("a, b ,,c")), vec!["a", "b", "c"]);
        assert_eq!(parse_tags(&json!("  vip  ")), vec!["vip"]);
        assert!(parse_tags(&json!("")).is_empty());
        assert!(parse_tags(&json!(" , ,")).is_empty());
    }

    #[test]
    fn test_parse_tags_keeps_duplicates() {
        assert_eq!(parse_tags(&json!("vip,vip")), vec!["vip", "vip"]);
    }

    #[test]
    fn test_parse_tags_passes_string_lists_through() {
        // No trimming or filtering for lists.
        assert_eq!(
            parse_tags(&json!([" vip ", "", "b2b"])),
            vec![" vip ", "", "b2b"]
        );
        assert!(parse_tags(&json!([])).is_empty());
    }

    #[test]
    fn test_parse_tags_rejects_other_shapes() {
        assert!(parse_tags(&json!(42)).is_empty());
        assert!(parse_tags(&Value::Null).is_empty());
        assert!(parse_tags(&json!({"tag": "vip"})).is_empty());
        assert!(parse_tags(&json!(["vip", 1])).is_empty());
        assert!(parse_tags(&json!(true)).is_empty());
    }

    #[test]
    fn test_is_tag_input() {
        assert!(is_tag_input(&json!("vip")));
        assert!(is_tag_input(&json!(["vip"])));
        assert!(is_tag_input(&json!([])));
        assert!(!is_tag_input(&json!(["vip", 2])));
        assert!(!is_tag_input(&json!(7)));
    }
}
