use crate::error::KontaktError;
use crate::ocr::TextRecognizer;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;

pub const DEFAULT_COMMAND: &str = "tesseract";
pub const DEFAULT_LANGUAGES: &str = "deu+eng";
/// Page segmentation mode 6: assume a single uniform block of text.
pub const DEFAULT_PSM: u8 = 6;

/// How to invoke the tesseract executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractConfig {
    pub command: PathBuf,
    pub languages: String,
    pub psm: u8,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        TesseractConfig {
            command: PathBuf::from(DEFAULT_COMMAND),
            languages: DEFAULT_LANGUAGES.into(),
            psm: DEFAULT_PSM,
        }
    }
}

/// OCR backend that shells out to the `tesseract` CLI.
pub struct TesseractRecognizer {
    config: TesseractConfig,
}

impl TesseractRecognizer {
    pub fn new(config: TesseractConfig) -> Self {
        TesseractRecognizer { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    /// Check that the configured executable runs.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn args(&self) -> Vec<String> {
        vec![
            "stdout".into(),
            "-l".into(),
            self.config.languages.clone(),
            "--psm".into(),
            self.config.psm.to_string(),
        ]
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, KontaktError> {
        let tmpfile = tempfile::Builder::new()
            .prefix("kontakt-ocr")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(tmpfile.path(), ImageFormat::Png)?;

        let output = Command::new(&self.config.command)
            .arg(tmpfile.path())
            .args(self.args())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KontaktError::TesseractNotFound {
                        command: self.config.command.clone(),
                    }
                } else {
                    KontaktError::Io(e)
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(KontaktError::ToolFailed {
                tool: "tesseract",
                code,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}
