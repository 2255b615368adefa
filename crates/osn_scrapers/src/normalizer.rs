use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^\w\-./]").expect("valid normalizer pattern");
}

/// Keep only word characters, `-`, `.` and `/`. Everything else, spaces
/// included, is dropped.
pub fn normalize_name(name: &str) -> String {
    DISALLOWED.replace_all(name, "").into_owned()
}
