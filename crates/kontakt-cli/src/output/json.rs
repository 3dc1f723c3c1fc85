use kontakt_core::error::KontaktError;
use kontakt_core::model::Record;

pub fn print(records: &[Record]) -> Result<(), KontaktError> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{json}");
    Ok(())
}
