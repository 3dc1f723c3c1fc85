use regex::Regex;
use std::sync::LazyLock;

/// German-style postal code: 4 to 6 digits, whole token.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,6}$").expect("valid postal code regex"));

/// International phone number anchored at the end of the text.
static TRAILING_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\d[\d\s\-\(\)]+$").expect("valid phone regex"));

/// Marker that starts the repeated table header row ("PLZ Ort Strasse ...").
pub const HEADER_MARKER: &str = "plz";

pub fn is_postal_code(token: &str) -> bool {
    POSTAL_CODE.is_match(token)
}

pub fn is_email_token(token: &str) -> bool {
    token.contains('@')
}

pub fn is_header_row(line: &str) -> bool {
    line.to_lowercase().starts_with(HEADER_MARKER)
}

/// Find a trailing phone number in `text`, if any.
pub fn trailing_phone(text: &str) -> Option<&str> {
    TRAILING_PHONE.find(text).map(|m| m.as_str())
}
