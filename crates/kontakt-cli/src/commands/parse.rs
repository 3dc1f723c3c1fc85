use kontakt_core::error::KontaktError;
use kontakt_core::model::ColumnSelection;
use std::io::Read;
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, columns: &str, output_format: &str) -> Result<i32, KontaktError> {
    let selection: ColumnSelection = columns.parse()?;

    let text = if input_file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&input_file)?
    };

    let records = kontakt_core::parse_text(&text, &selection);

    match output_format {
        "json" => output::json::print(&records)?,
        _ => {
            output::table::print(&records, &selection);
            eprintln!("{} record(s) parsed", records.len());
        }
    }

    Ok(0)
}
