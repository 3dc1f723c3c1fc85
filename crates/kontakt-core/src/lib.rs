pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod ocr;
pub mod output;
pub mod parsing;
pub mod raster;

use batch::{BatchObserver, BatchReport};
use config::BatchConfig;
use error::KontaktError;
use model::{ColumnSelection, Record};
use ocr::TextRecognizer;
use raster::PageRasterizer;

/// Main API entry point: extract contact tables from every PDF in the
/// configured input directory.
///
/// Fails up front if the input directory is missing or holds no PDFs.
/// After that, per-file failures are recorded in the report instead of
/// aborting the run.
pub fn run(
    config: &BatchConfig,
    rasterizer: &dyn PageRasterizer,
    recognizer: &dyn TextRecognizer,
    observer: &mut dyn BatchObserver,
) -> Result<BatchReport, KontaktError> {
    config.validate()?;
    let files = batch::discover_pdfs(&config.input_dir)?;
    log::info!(
        "found {} PDF file(s) in {}",
        files.len(),
        config.input_dir.display()
    );
    observer.batch_started(files.len());
    Ok(batch::run_batch(
        &files,
        rasterizer,
        recognizer,
        config,
        observer,
    ))
}

/// Parse an existing OCR transcription (pages separated by form feeds).
pub fn parse_text(text: &str, selection: &ColumnSelection) -> Vec<Record> {
    parsing::split_pages(text)
        .into_iter()
        .flat_map(|(page, page_text)| parsing::parse_page_text(page_text, page, selection))
        .collect()
}
