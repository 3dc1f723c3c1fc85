//! Integration tests for the batch pipeline.
//!
//! Uses a MockRasterizer and MockRecognizer instead of poppler and
//! tesseract, so these tests run without any external tools. The mock
//! rasterizer encodes the page number in the image height, which the mock
//! recognizer uses to look up that page's transcription.

use calamine::{open_workbook, Data, Reader, Xlsx};
use image::DynamicImage;
use kontakt_core::batch::{process_document, BatchObserver, FileOutcome, FileStatus, NoopObserver};
use kontakt_core::config::BatchConfig;
use kontakt_core::error::KontaktError;
use kontakt_core::model::ColumnSelection;
use kontakt_core::ocr::TextRecognizer;
use kontakt_core::raster::{PageRasterizer, RasterDocument, Rotation};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const PAGE_WIDTH: u32 = 1000;

type RenderLog = Arc<Mutex<Vec<(usize, Rotation, u32)>>>;

struct MockRasterizer {
    pages: HashMap<String, usize>,
    renders: RenderLog,
}

impl MockRasterizer {
    fn new(docs: &[(&str, usize)]) -> Self {
        MockRasterizer {
            pages: docs.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
            renders: RenderLog::default(),
        }
    }

    fn renders(&self) -> Vec<(usize, Rotation, u32)> {
        self.renders.lock().unwrap().clone()
    }
}

struct MockDocument {
    page_count: usize,
    renders: RenderLog,
}

impl PageRasterizer for MockRasterizer {
    fn open(&self, pdf_path: &Path) -> Result<Box<dyn RasterDocument>, KontaktError> {
        let name = pdf_path.file_name().unwrap().to_string_lossy().to_string();
        match self.pages.get(&name) {
            Some(&page_count) => Ok(Box::new(MockDocument {
                page_count,
                renders: Arc::clone(&self.renders),
            })),
            None => Err(KontaktError::ToolFailed {
                tool: "pdfinfo",
                code: 1,
                stderr: format!("Syntax Error: Couldn't read {name}"),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

impl RasterDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(
        &self,
        page_number: usize,
        rotation: Rotation,
        dpi: u32,
    ) -> Result<DynamicImage, KontaktError> {
        self.renders
            .lock()
            .unwrap()
            .push((page_number, rotation, dpi));
        Ok(DynamicImage::new_luma8(PAGE_WIDTH, page_number as u32))
    }
}

struct MockRecognizer {
    pages: HashMap<u32, String>,
    seen_widths: Mutex<Vec<u32>>,
}

impl MockRecognizer {
    fn new(pages: &[(u32, &str)]) -> Self {
        MockRecognizer {
            pages: pages.iter().map(|(p, t)| (*p, t.to_string())).collect(),
            seen_widths: Mutex::new(Vec::new()),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, KontaktError> {
        self.seen_widths.lock().unwrap().push(image.width());
        Ok(self.pages.get(&image.height()).cloned().unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl BatchObserver for RecordingObserver {
    fn batch_started(&mut self, file_count: usize) {
        self.events.push(format!("batch {file_count}"));
    }

    fn file_started(&mut self, source: &Path, page_count: usize) {
        let name = source.file_name().unwrap().to_string_lossy();
        self.events.push(format!("start {name} {page_count}"));
    }

    fn page_finished(&mut self, page_number: usize, records_on_page: usize) {
        self.events
            .push(format!("page {page_number} {records_on_page}"));
    }

    fn file_finished(&mut self, outcome: &FileOutcome) {
        let name = outcome.source.file_name().unwrap().to_string_lossy();
        let state = if outcome.is_failed() { "failed" } else { "ok" };
        self.events.push(format!("done {name} {state}"));
    }
}

const PAGE_ONE: &str = "\
PLZ Ort Strasse Name Email Telefon
Acme GmbH Berlin 12 10115 Jane Doe jane.doe@acme.de +49 30 1234567
Seite 1 von 2
";

const PAGE_TWO: &str = "\
Beta KG Köln 7 50667 John Roe Prokurist john@beta.de
Gamma Köln 7 50667 Solo gamma@example.de
Delta Handels GmbH München 3 80331 Erika Muster erika@delta.de +49 89 555 01
";

fn config_in(dir: &Path, columns: &str) -> BatchConfig {
    let input_dir = dir.join("input");
    std::fs::create_dir_all(&input_dir).unwrap();
    BatchConfig {
        input_dir,
        output_dir: dir.join("output"),
        columns: columns.parse().unwrap(),
        ..BatchConfig::default()
    }
}

fn touch(config: &BatchConfig, name: &str) -> PathBuf {
    let path = config.input_dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n").unwrap();
    path
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn read_xlsx(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Records are tagged with page numbers in page then line order
// ---------------------------------------------------------------------------
#[test]
fn process_document_tags_pages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Company,Name,Title,Phone");
    let pdf = touch(&config, "kunden.pdf");

    let rasterizer = MockRasterizer::new(&[("kunden.pdf", 2)]);
    let recognizer = MockRecognizer::new(&[(1, PAGE_ONE), (2, PAGE_TWO)]);

    let result =
        process_document(&pdf, &rasterizer, &recognizer, &config, &mut NoopObserver).unwrap();

    assert_eq!(result.page_count, 2);
    let summary: Vec<(usize, &str)> = result
        .records
        .iter()
        .map(|r| (r.page, r.company.as_deref().unwrap()))
        .collect();
    // "Gamma ..." has a single name token and is skipped.
    assert_eq!(
        summary,
        vec![(1, "Acme GmbH"), (2, "Beta KG"), (2, "Delta Handels GmbH")]
    );
    assert_eq!(result.records[1].title.as_deref(), Some("Prokurist"));
    assert_eq!(result.records[2].phone.as_deref(), Some("+49 89 555 01"));
    assert!(result.records.iter().all(|r| r.email.is_none()));
}

// ---------------------------------------------------------------------------
// Rotation and DPI from the config reach the rasterizer for every page
// ---------------------------------------------------------------------------
#[test]
fn rotation_and_dpi_are_passed_to_rasterizer() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), "Email");
    config.rotation = Rotation::Clockwise90;
    config.dpi = 300;
    let pdf = touch(&config, "quer.pdf");

    let rasterizer = MockRasterizer::new(&[("quer.pdf", 3)]);
    let recognizer = MockRecognizer::new(&[]);

    process_document(&pdf, &rasterizer, &recognizer, &config, &mut NoopObserver).unwrap();

    assert_eq!(
        rasterizer.renders(),
        vec![
            (1, Rotation::Clockwise90, 300),
            (2, Rotation::Clockwise90, 300),
            (3, Rotation::Clockwise90, 300),
        ]
    );
}

#[test]
fn default_config_renders_unrotated_at_200_dpi() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Email");
    let pdf = touch(&config, "scan.pdf");

    let rasterizer = MockRasterizer::new(&[("scan.pdf", 1)]);
    let recognizer = MockRecognizer::new(&[]);

    process_document(&pdf, &rasterizer, &recognizer, &config, &mut NoopObserver).unwrap();

    assert_eq!(rasterizer.renders(), vec![(1, Rotation::None, 200)]);
}

// ---------------------------------------------------------------------------
// The right margin is cropped before recognition
// ---------------------------------------------------------------------------
#[test]
fn pages_are_cropped_before_recognition() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), "Email");
    config.crop_ratio = 0.1;
    let pdf = touch(&config, "scan.pdf");

    let rasterizer = MockRasterizer::new(&[("scan.pdf", 3)]);
    let recognizer = MockRecognizer::new(&[]);

    let result =
        process_document(&pdf, &rasterizer, &recognizer, &config, &mut NoopObserver).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(*recognizer.seen_widths.lock().unwrap(), vec![900, 900, 900]);
}

// ---------------------------------------------------------------------------
// Full run: CSV keeps Page, XLSX drops it, both have the same rows
// ---------------------------------------------------------------------------
#[test]
fn run_writes_csv_and_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Company,City,StreetNo,PostalCode,Name,Title,Email,Phone");
    touch(&config, "kunden.pdf");

    let rasterizer = MockRasterizer::new(&[("kunden.pdf", 2)]);
    let recognizer = MockRecognizer::new(&[(1, PAGE_ONE), (2, PAGE_TWO)]);

    let report = kontakt_core::run(&config, &rasterizer, &recognizer, &mut NoopObserver).unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.total_rows(), 3);

    let paths = match &report.files[0].status {
        FileStatus::Written { rows, paths } => {
            assert_eq!(*rows, 3);
            paths.clone()
        }
        FileStatus::Failed { error } => panic!("unexpected failure: {error}"),
    };
    assert_eq!(paths.csv, config.output_dir.join("kunden_tables.csv"));
    assert_eq!(paths.xlsx, config.output_dir.join("kunden_tables.xlsx"));

    let (headers, rows) = read_csv(&paths.csv);
    assert_eq!(
        headers,
        vec!["Page", "Company", "City", "StreetNo", "PostalCode", "Name", "Title", "Email", "Phone"]
    );
    let pages: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(pages, vec!["1", "2", "2"]);
    assert_eq!(
        rows[0],
        vec![
            "1",
            "Acme GmbH",
            "Berlin",
            "12",
            "10115",
            "Jane Doe",
            "",
            "jane.doe@acme.de",
            "+49 30 1234567"
        ]
    );

    let sheet = read_xlsx(&paths.xlsx);
    assert_eq!(sheet.len(), 4);
    assert_eq!(
        sheet[0],
        vec!["Company", "City", "StreetNo", "PostalCode", "Name", "Title", "Email", "Phone"]
    );
    for (csv_row, xlsx_row) in rows.iter().zip(&sheet[1..]) {
        assert_eq!(&csv_row[1..], xlsx_row.as_slice());
    }
}

// ---------------------------------------------------------------------------
// A failing file is recorded and later files still get processed
// ---------------------------------------------------------------------------
#[test]
fn failing_file_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Email");
    let broken = touch(&config, "broken.pdf");
    let good = touch(&config, "good.pdf");

    let rasterizer = MockRasterizer::new(&[("good.pdf", 1)]);
    let recognizer = MockRecognizer::new(&[(1, PAGE_ONE)]);
    let mut observer = RecordingObserver::default();

    let report = kontakt_core::batch::run_batch(
        &[broken, good],
        &rasterizer,
        &recognizer,
        &config,
        &mut observer,
    );

    assert!(report.has_failures());
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.succeeded().count(), 1);
    match &report.files[0].status {
        FileStatus::Failed { error } => assert!(error.contains("pdfinfo failed")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!config.output_dir.join("broken_tables.csv").exists());
    assert!(config.output_dir.join("good_tables.csv").exists());

    assert_eq!(
        observer.events,
        vec![
            "done broken.pdf failed",
            "start good.pdf 1",
            "page 1 1",
            "done good.pdf ok",
        ]
    );
}

// ---------------------------------------------------------------------------
// The library entry point announces the batch before processing files
// ---------------------------------------------------------------------------
#[test]
fn run_reports_file_count_to_observer() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Email");
    touch(&config, "kunden.pdf");

    let rasterizer = MockRasterizer::new(&[("kunden.pdf", 1)]);
    let recognizer = MockRecognizer::new(&[(1, PAGE_ONE)]);
    let mut observer = RecordingObserver::default();

    let report = kontakt_core::run(&config, &rasterizer, &recognizer, &mut observer).unwrap();

    assert!(!report.has_failures());
    assert_eq!(
        observer.events,
        vec![
            "batch 1",
            "start kunden.pdf 1",
            "page 1 1",
            "done kunden.pdf ok",
        ]
    );
}

// ---------------------------------------------------------------------------
// Pre-flight failures
// ---------------------------------------------------------------------------
#[test]
fn run_fails_without_input_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig {
        input_dir: dir.path().join("missing"),
        ..BatchConfig::default()
    };
    let err = kontakt_core::run(
        &config,
        &MockRasterizer::new(&[]),
        &MockRecognizer::new(&[]),
        &mut NoopObserver,
    )
    .unwrap_err();
    assert!(matches!(err, KontaktError::InputDirNotFound(_)));
}

#[test]
fn run_fails_without_pdfs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "Email");
    let err = kontakt_core::run(
        &config,
        &MockRasterizer::new(&[]),
        &MockRecognizer::new(&[]),
        &mut NoopObserver,
    )
    .unwrap_err();
    assert!(matches!(err, KontaktError::NoPdfFiles(_)));
    assert!(!config.output_dir.exists());
}

// ---------------------------------------------------------------------------
// Parsing an existing transcription
// ---------------------------------------------------------------------------
#[test]
fn parse_text_splits_pages_on_form_feed() {
    let text = format!("{PAGE_ONE}\x0c{PAGE_TWO}");
    let selection: ColumnSelection = "Email,Phone".parse().unwrap();
    let records = kontakt_core::parse_text(&text, &selection);

    let emails: Vec<(usize, &str)> = records
        .iter()
        .map(|r| (r.page, r.email.as_deref().unwrap()))
        .collect();
    assert_eq!(
        emails,
        vec![
            (1, "jane.doe@acme.de"),
            (2, "john@beta.de"),
            (2, "erika@delta.de")
        ]
    );
    assert!(records.iter().all(|r| r.name.is_none()));
}
