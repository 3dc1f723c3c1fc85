pub mod tesseract;

use crate::error::KontaktError;
use image::DynamicImage;

/// Trait for OCR backends.
pub trait TextRecognizer: Send + Sync {
    /// Transcribe an image into plain multi-line text.
    fn recognize(&self, image: &DynamicImage) -> Result<String, KontaktError>;

    /// Name of this recognition backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
