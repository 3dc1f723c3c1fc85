use kontakt_core::model::{ColumnSelection, Record, PAGE_COLUMN};

pub fn print(records: &[Record], selection: &ColumnSelection) {
    print!("{}", format_records(records, selection));
}

/// Render records as a left-aligned text table with a leading Page column.
pub fn format_records(records: &[Record], selection: &ColumnSelection) -> String {
    let mut header = vec![PAGE_COLUMN.to_string()];
    header.extend(selection.column_names().iter().map(|s| s.to_string()));

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.page.to_string()];
            row.extend(r.row(selection).iter().map(|s| s.to_string()));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
