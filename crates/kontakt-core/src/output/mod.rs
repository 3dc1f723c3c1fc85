pub mod csv;
pub mod xlsx;

use crate::error::KontaktError;
use crate::model::{ColumnSelection, DocumentResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CSV_SUFFIX: &str = "_tables.csv";
pub const XLSX_SUFFIX: &str = "_tables.xlsx";

/// The two artifacts written for one input PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

impl OutputPaths {
    pub fn for_stem(output_dir: &Path, stem: &str) -> Self {
        OutputPaths {
            csv: output_dir.join(format!("{stem}{CSV_SUFFIX}")),
            xlsx: output_dir.join(format!("{stem}{XLSX_SUFFIX}")),
        }
    }
}

/// Write a document's records as `<stem>_tables.csv` (with Page) and
/// `<stem>_tables.xlsx` (without Page), replacing existing files.
pub fn write_document(
    result: &DocumentResult,
    output_dir: &Path,
    selection: &ColumnSelection,
) -> Result<OutputPaths, KontaktError> {
    std::fs::create_dir_all(output_dir)?;
    let paths = OutputPaths::for_stem(output_dir, &result.stem());

    csv::write_csv(&paths.csv, &result.records, selection)?;
    xlsx::write_xlsx(&paths.xlsx, &result.records, selection)?;

    log::debug!(
        "wrote {} record(s) to {} and {}",
        result.records.len(),
        paths.csv.display(),
        paths.xlsx.display()
    );
    Ok(paths)
}
