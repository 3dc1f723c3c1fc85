use kontakt_core::batch::FileStatus;
use kontakt_core::config::BatchConfig;
use kontakt_core::error::KontaktError;
use kontakt_core::ocr::tesseract::{TesseractConfig, TesseractRecognizer};
use kontakt_core::raster::poppler::PopplerRasterizer;
use std::path::PathBuf;

use crate::progress::ProgressObserver;

pub struct RunArgs {
    pub rotate: u16,
    pub crop: f64,
    pub columns: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub dpi: u32,
    pub tesseract: PathBuf,
    pub lang: String,
    pub psm: u8,
    pub quiet: bool,
}

/// Returns the process exit code: 1 if any file failed, 0 otherwise.
pub fn run(args: RunArgs) -> Result<i32, KontaktError> {
    let config = BatchConfig::from_options(
        args.input,
        args.output,
        args.rotate,
        args.crop,
        args.dpi,
        &args.columns,
    )?;

    let recognizer = TesseractRecognizer::new(TesseractConfig {
        command: args.tesseract,
        languages: args.lang,
        psm: args.psm,
    });
    if !recognizer.is_available() {
        return Err(KontaktError::TesseractNotFound {
            command: recognizer.config().command.clone(),
        });
    }
    if !PopplerRasterizer::is_available() {
        return Err(KontaktError::PopplerNotFound("pdftoppm"));
    }
    let rasterizer = PopplerRasterizer::new();

    log::debug!(
        "rotation {}, crop {}, dpi {}, columns {}",
        config.rotation,
        config.crop_ratio,
        config.dpi,
        config.columns
    );

    let mut observer = ProgressObserver::new(args.quiet);
    let report = kontakt_core::run(&config, &rasterizer, &recognizer, &mut observer)?;

    println!();
    for file in &report.files {
        let name = file
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.source.display().to_string());
        match &file.status {
            FileStatus::Written { rows, paths } => println!(
                "Complete: {name} - {rows} row(s) written to {} and {}",
                paths.csv.display(),
                paths.xlsx.display()
            ),
            FileStatus::Failed { error } => println!("Failed:   {name} - {error}"),
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        eprintln!(
            "{failed} of {} file(s) failed; see messages above",
            report.files.len()
        );
        return Ok(1);
    }
    Ok(0)
}
