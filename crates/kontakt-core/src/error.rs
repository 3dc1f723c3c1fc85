use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum KontaktError {
    #[error("input directory '{}' not found", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("no PDF files found in '{}'", .0.display())]
    NoPdfFiles(PathBuf),

    #[error("invalid rotation {0} (expected 0, 90, 180 or 270)")]
    InvalidRotation(u16),

    #[error("invalid crop ratio {0} (expected a value in [0, 1))")]
    InvalidCropRatio(f64),

    #[error("invalid DPI {0} (expected a positive value)")]
    InvalidDpi(u32),

    #[error("unknown column '{0}'. Valid columns: Company, City, StreetNo, PostalCode, Name, Title, Email, Phone")]
    UnknownColumn(String),

    #[error("column selection must name at least one column")]
    EmptyColumnSelection,

    #[error("tesseract not found at '{}'. Install tesseract-ocr or pass --tesseract / KONTAKT_TESSERACT", .command.display())]
    TesseractNotFound { command: PathBuf },

    #[error("{0} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PopplerNotFound(&'static str),

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
