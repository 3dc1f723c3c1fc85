use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::KontaktError;

/// Name of the implicit page column.
pub const PAGE_COLUMN: &str = "Page";

/// A selectable output column. `Page` is not a field: it is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Company,
    City,
    StreetNo,
    PostalCode,
    Name,
    Title,
    Email,
    Phone,
}

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; 8] = [
        Field::Company,
        Field::City,
        Field::StreetNo,
        Field::PostalCode,
        Field::Name,
        Field::Title,
        Field::Email,
        Field::Phone,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Company => "Company",
            Field::City => "City",
            Field::StreetNo => "StreetNo",
            Field::PostalCode => "PostalCode",
            Field::Name => "Name",
            Field::Title => "Title",
            Field::Email => "Email",
            Field::Phone => "Phone",
        }
    }

    /// Case-insensitive lookup by column name.
    pub fn from_name(s: &str) -> Option<Field> {
        let s = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.column_name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Ordered, duplicate-free set of requested fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    fields: Vec<Field>,
}

impl ColumnSelection {
    pub fn new(fields: Vec<Field>) -> Result<Self, KontaktError> {
        let mut deduped: Vec<Field> = Vec::with_capacity(fields.len());
        for field in fields {
            if !deduped.contains(&field) {
                deduped.push(field);
            }
        }
        if deduped.is_empty() {
            return Err(KontaktError::EmptyColumnSelection);
        }
        Ok(ColumnSelection { fields: deduped })
    }

    pub fn all() -> Self {
        ColumnSelection {
            fields: Field::ALL.to_vec(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Column headers in selection order, without `Page`.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column_name()).collect()
    }
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for ColumnSelection {
    type Err = KontaktError;

    /// Parse a comma-separated list such as `"Email,Phone"`.
    ///
    /// Blank segments and an explicit `Page` entry are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = Vec::new();
        for part in s.split(',') {
            let name = part.trim();
            if name.is_empty() || name.eq_ignore_ascii_case(PAGE_COLUMN) {
                continue;
            }
            let field =
                Field::from_name(name).ok_or_else(|| KontaktError::UnknownColumn(name.into()))?;
            fields.push(field);
        }
        ColumnSelection::new(fields)
    }
}

impl fmt::Display for ColumnSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_names().join(","))
    }
}

/// One contact row extracted from a single OCR line.
///
/// Unselected fields are `None`; selected fields that the line left empty
/// (Title, Phone) are `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Record {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Company => &self.company,
            Field::City => &self.city,
            Field::StreetNo => &self.street_no,
            Field::PostalCode => &self.postal_code,
            Field::Name => &self.name,
            Field::Title => &self.title,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        };
        value.as_deref()
    }

    /// Fields carrying a value, in canonical order.
    pub fn populated_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// Cell values for the given selection, in selection order.
    /// Absent fields become empty cells.
    pub fn row(&self, selection: &ColumnSelection) -> Vec<&str> {
        selection
            .fields()
            .iter()
            .map(|f| self.get(*f).unwrap_or(""))
            .collect()
    }
}

/// All records extracted from one PDF, in page then line order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    pub source: PathBuf,
    pub page_count: usize,
    pub records: Vec<Record>,
}

impl DocumentResult {
    /// Output file stem: the source file name without extension.
    pub fn stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into())
    }
}
