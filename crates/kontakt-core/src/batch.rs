use crate::config::BatchConfig;
use crate::error::KontaktError;
use crate::model::DocumentResult;
use crate::ocr::TextRecognizer;
use crate::output::{write_document, OutputPaths};
use crate::parsing::parse_page_text;
use crate::raster::{crop_right_margin, PageRasterizer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Progress callbacks for a batch run. All methods default to no-ops.
pub trait BatchObserver {
    fn batch_started(&mut self, _file_count: usize) {}
    fn file_started(&mut self, _source: &Path, _page_count: usize) {}
    fn page_finished(&mut self, _page_number: usize, _records_on_page: usize) {}
    fn file_finished(&mut self, _outcome: &FileOutcome) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Written { rows: usize, paths: OutputPaths },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| !f.is_failed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(FileOutcome::is_failed)
    }

    pub fn total_rows(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                FileStatus::Written { rows, .. } => rows,
                FileStatus::Failed { .. } => 0,
            })
            .sum()
    }
}

/// List the PDF files directly inside `dir`, in directory order.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, KontaktError> {
    if !dir.is_dir() {
        return Err(KontaktError::InputDirNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(KontaktError::NoPdfFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Render, recognize and parse every page of one PDF.
///
/// The document handle is dropped before returning, including on error.
pub fn process_document(
    pdf_path: &Path,
    rasterizer: &dyn PageRasterizer,
    recognizer: &dyn TextRecognizer,
    config: &BatchConfig,
    observer: &mut dyn BatchObserver,
) -> Result<DocumentResult, KontaktError> {
    let document = rasterizer.open(pdf_path)?;
    let page_count = document.page_count();
    log::info!(
        "processing {} ({} page(s), {} + {})",
        pdf_path.display(),
        page_count,
        rasterizer.backend_name(),
        recognizer.backend_name()
    );
    observer.file_started(pdf_path, page_count);

    let mut records = Vec::new();
    for page_number in 1..=page_count {
        let image = document.render_page(page_number, config.rotation, config.dpi)?;
        let image = crop_right_margin(&image, config.crop_ratio);

        let text = recognizer.recognize(&image)?;
        if text.trim().is_empty() {
            log::warn!(
                "{} page {page_number}: OCR returned no text",
                pdf_path.display()
            );
        }

        let page_records = parse_page_text(&text, page_number, &config.columns);
        log::debug!(
            "{} page {page_number}: {} record(s)",
            pdf_path.display(),
            page_records.len()
        );
        observer.page_finished(page_number, page_records.len());
        records.extend(page_records);
    }

    Ok(DocumentResult {
        source: pdf_path.to_path_buf(),
        page_count,
        records,
    })
}

/// Process one PDF and write its output tables.
pub fn process_file(
    pdf_path: &Path,
    rasterizer: &dyn PageRasterizer,
    recognizer: &dyn TextRecognizer,
    config: &BatchConfig,
    observer: &mut dyn BatchObserver,
) -> Result<(usize, OutputPaths), KontaktError> {
    let result = process_document(pdf_path, rasterizer, recognizer, config, observer)?;
    let paths = write_document(&result, &config.output_dir, &config.columns)?;
    Ok((result.records.len(), paths))
}

/// Process files one after another. A failing file is logged and recorded,
/// and the batch moves on to the next one.
pub fn run_batch(
    files: &[PathBuf],
    rasterizer: &dyn PageRasterizer,
    recognizer: &dyn TextRecognizer,
    config: &BatchConfig,
    observer: &mut dyn BatchObserver,
) -> BatchReport {
    let mut report = BatchReport::default();

    for pdf_path in files {
        let status = match process_file(pdf_path, rasterizer, recognizer, config, observer) {
            Ok((rows, paths)) => {
                log::info!("{}: {rows} row(s) written", pdf_path.display());
                FileStatus::Written { rows, paths }
            }
            Err(e) => {
                log::error!("{}: {e}", pdf_path.display());
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        let outcome = FileOutcome {
            source: pdf_path.clone(),
            status,
        };
        observer.file_finished(&outcome);
        report.files.push(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("input");
        assert!(matches!(
            discover_pdfs(&missing),
            Err(KontaktError::InputDirNotFound(_))
        ));
    }

    #[test]
    fn test_discover_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("b.PDF"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let mut names: Vec<String> = discover_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();
        assert!(matches!(
            discover_pdfs(dir.path()),
            Err(KontaktError::NoPdfFiles(_))
        ));
    }

    #[test]
    fn test_report_totals() {
        let report = BatchReport {
            files: vec![
                FileOutcome {
                    source: "a.pdf".into(),
                    status: FileStatus::Written {
                        rows: 3,
                        paths: OutputPaths::for_stem(Path::new("out"), "a"),
                    },
                },
                FileOutcome {
                    source: "b.pdf".into(),
                    status: FileStatus::Failed {
                        error: "boom".into(),
                    },
                },
            ],
        };
        assert_eq!(report.total_rows(), 3);
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(report.has_failures());
    }
}
