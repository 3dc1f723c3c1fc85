pub mod patterns;

use crate::model::{ColumnSelection, Field, Record};
use patterns::{is_email_token, is_header_row, is_postal_code, trailing_phone};

/// Minimum number of tokens before the postal code: company, city, street number.
const MIN_PREFIX_TOKENS: usize = 3;

/// Minimum number of tokens between postal code and email: first and last name.
const MIN_NAME_TOKENS: usize = 2;

/// Why a line did not produce a record.
///
/// Rejections are expected for most OCR lines and are never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    Empty,
    HeaderRow,
    NoEmail,
    NoPostalCode,
    InsufficientPrefix,
    InsufficientName,
}

/// All fields derivable from one line, before column projection.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContactFields {
    company: String,
    city: String,
    street_no: String,
    postal_code: String,
    name: String,
    title: String,
    email: String,
    phone: String,
}

impl ContactFields {
    fn into_record(self, page: usize, selection: &ColumnSelection) -> Record {
        let pick = |field: Field, value: String| selection.contains(field).then_some(value);
        Record {
            page,
            company: pick(Field::Company, self.company),
            city: pick(Field::City, self.city),
            street_no: pick(Field::StreetNo, self.street_no),
            postal_code: pick(Field::PostalCode, self.postal_code),
            name: pick(Field::Name, self.name),
            title: pick(Field::Title, self.title),
            email: pick(Field::Email, self.email),
            phone: pick(Field::Phone, self.phone),
        }
    }
}

/// Parse one OCR line into a record, or `None` if it is not a data row.
pub fn parse_line(line: &str, page: usize, selection: &ColumnSelection) -> Option<Record> {
    classify_line(line, page, selection).ok()
}

/// Like [`parse_line`], but reports why a line was rejected.
///
/// The line is split on whitespace and anchored on two tokens: the first
/// token containing `@` (email) and the first 4-6 digit token before it
/// (postal code). Everything else is derived from positions relative to
/// those anchors:
///
/// ```text
/// <company...> <city> <street_no> <postal> <first> <last> [title...] <email> [phone...]
/// ```
pub fn classify_line(
    line: &str,
    page: usize,
    selection: &ColumnSelection,
) -> Result<Record, LineRejection> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineRejection::Empty);
    }
    if is_header_row(line) {
        return Err(LineRejection::HeaderRow);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();

    let email_idx = tokens
        .iter()
        .position(|t| is_email_token(t))
        .ok_or(LineRejection::NoEmail)?;

    let postal_idx = tokens[..email_idx]
        .iter()
        .position(|t| is_postal_code(t))
        .ok_or(LineRejection::NoPostalCode)?;
    if postal_idx < MIN_PREFIX_TOKENS {
        return Err(LineRejection::InsufficientPrefix);
    }

    let after = &tokens[postal_idx + 1..email_idx];
    if after.len() < MIN_NAME_TOKENS {
        return Err(LineRejection::InsufficientName);
    }

    let phone_text = tokens[email_idx + 1..].join(" ");

    let fields = ContactFields {
        company: tokens[..postal_idx - 2].join(" "),
        city: tokens[postal_idx - 2].to_string(),
        street_no: tokens[postal_idx - 1].to_string(),
        postal_code: tokens[postal_idx].to_string(),
        name: after[..MIN_NAME_TOKENS].join(" "),
        title: after[MIN_NAME_TOKENS..].join(" "),
        email: tokens[email_idx].to_string(),
        phone: trailing_phone(&phone_text).unwrap_or("").to_string(),
    };

    Ok(fields.into_record(page, selection))
}

/// Parse every line of a recognized page into records, in line order.
pub fn parse_page_text(text: &str, page: usize, selection: &ColumnSelection) -> Vec<Record> {
    let mut records = Vec::new();
    for (line_index, line) in split_lines(text).into_iter().enumerate() {
        match classify_line(line, page, selection) {
            Ok(record) => records.push(record),
            Err(LineRejection::Empty) => {}
            Err(reason) => {
                log::trace!("page {page} line {line_index}: skipped ({reason:?}): {line}");
            }
        }
    }
    records
}

/// Split text into lines on every line boundary OCR output may contain:
/// `\n`, `\r`, `\r\n`, vertical tab, form feed, the file/group/record
/// separators, NEL, and the Unicode line and paragraph separators.
///
/// A trailing boundary does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let is_break = matches!(
            c,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}'
                | '\u{2029}'
        );
        if !is_break {
            continue;
        }
        lines.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                end = j + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Split a multi-page transcription on form feeds.
///
/// Returns `(page_number, text)` pairs with 1-based page numbers. A trailing
/// empty page after the final form feed is dropped.
pub fn split_pages(text: &str) -> Vec<(usize, &str)> {
    let mut pages: Vec<(usize, &str)> = text
        .split('\x0c')
        .enumerate()
        .map(|(i, page_text)| (i + 1, page_text))
        .collect();
    if pages.len() > 1 && pages.last().is_some_and(|(_, t)| t.trim().is_empty()) {
        pages.pop();
    }
    pages
}
