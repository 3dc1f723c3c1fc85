use crate::error::KontaktError;
use crate::model::{ColumnSelection, Record, PAGE_COLUMN};
use std::io::Write;
use std::path::Path;

/// Write records as CSV with a leading `Page` column.
pub fn write_csv(
    path: &Path,
    records: &[Record],
    selection: &ColumnSelection,
) -> Result<(), KontaktError> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, records, selection)
}

pub fn write_csv_to<W: Write>(
    writer: W,
    records: &[Record],
    selection: &ColumnSelection,
) -> Result<(), KontaktError> {
    let mut csv_writer = ::csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec![PAGE_COLUMN];
    header.extend(selection.column_names());
    csv_writer.write_record(&header)?;

    for record in records {
        let page = record.page.to_string();
        let mut row = vec![page.as_str()];
        row.extend(record.row(selection));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
