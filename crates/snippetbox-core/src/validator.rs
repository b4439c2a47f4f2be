//! Form validation primitives and the per-form error accumulator.
//!
//! The predicates are pure functions. A [`Validator`] is embedded in every form struct and
//! collects messages keyed by field name, plus messages that belong to the form as a whole.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Loose RFC 5322 shape check, the same pattern browsers use for `type="email"` inputs.
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("EMAIL_RX is a valid pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    pub field_errors: BTreeMap<String, Vec<String>>,
    pub non_field_errors: Vec<String>,
}

impl Validator {
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    /// Record `message` under `key` only when `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    pub fn field_error(&self, key: &str) -> Option<&[String]> {
        self.field_errors.get(key).map(Vec::as_slice)
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Counts characters, not bytes.
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

pub fn permitted_value<T: PartialEq>(value: T, permitted: &[T]) -> bool {
    permitted.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x"));
        assert!(!not_blank(""));
        assert!(!not_blank("  \t\n"));
    }

    #[test]
    fn test_char_limits_count_unicode_scalars() {
        assert!(max_chars("héllo", 5));
        assert!(!max_chars("héllo!", 5));
        assert!(min_chars("pässwörd", 8));
        assert!(!min_chars("short", 8));
    }

    #[test]
    fn test_email_regex() {
        assert!(matches("alice@example.com", &EMAIL_RX));
        assert!(matches("bob.smith+tag@mail.example.co.uk", &EMAIL_RX));
        assert!(!matches("alice@", &EMAIL_RX));
        assert!(!matches("alice example.com", &EMAIL_RX));
        assert!(!matches("", &EMAIL_RX));
    }

    #[test]
    fn test_permitted_value() {
        assert!(permitted_value(7, &[1, 7, 365]));
        assert!(!permitted_value(30, &[1, 7, 365]));
        assert!(permitted_value("b", &["a", "b"]));
    }

    #[test]
    fn test_check_field_only_records_failures() {
        let mut v = Validator::default();
        v.check_field(true, "title", "This field cannot be blank");
        assert!(v.valid());

        v.check_field(false, "title", "This field cannot be blank");
        v.check_field(false, "title", "This field cannot be more than 100 characters long");
        assert!(!v.valid());
        assert_eq!(v.field_error("title").map(|m| m.len()), Some(2));
        assert!(v.field_error("content").is_none());
    }

    #[test]
    fn test_non_field_errors_invalidate() {
        let mut v = Validator::default();
        v.add_non_field_error("Email or password is incorrect");
        assert!(!v.valid());
        assert!(v.field_errors.is_empty());
    }
}
