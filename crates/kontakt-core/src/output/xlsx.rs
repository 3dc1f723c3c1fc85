use crate::error::KontaktError;
use crate::model::{ColumnSelection, Record};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Write records to a single-sheet workbook. The `Page` column is omitted.
///
/// Every record gets a row, even when all of its selected values are empty:
/// empty values are written as formatted blank cells, because the writer
/// drops unformatted empty strings.
pub fn write_xlsx(
    path: &Path,
    records: &[Record],
    selection: &ColumnSelection,
) -> Result<(), KontaktError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let text_format = Format::new().set_num_format("@");
    let worksheet = workbook.add_worksheet();

    for (col, name) in selection.column_names().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.row(selection).iter().enumerate() {
            if value.is_empty() {
                worksheet.write_blank(row, col as u16, &text_format)?;
            } else {
                worksheet.write_string_with_format(row, col as u16, *value, &text_format)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
