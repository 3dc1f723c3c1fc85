pub mod poppler;

use crate::error::KontaktError;
use image::DynamicImage;
use std::fmt;
use std::path::Path;

/// Clockwise page rotation applied before recognition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    pub fn apply(&self, image: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => image,
            Rotation::Clockwise90 => image.rotate90(),
            Rotation::Clockwise180 => image.rotate180(),
            Rotation::Clockwise270 => image.rotate270(),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = KontaktError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            other => Err(KontaktError::InvalidRotation(other)),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// An opened PDF that can render its pages.
///
/// Any resources held for the document are released on drop.
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render a 1-based page at `dpi`, rotated clockwise by `rotation`.
    fn render_page(
        &self,
        page_number: usize,
        rotation: Rotation,
        dpi: u32,
    ) -> Result<DynamicImage, KontaktError>;
}

/// Trait for PDF rasterization backends.
pub trait PageRasterizer: Send + Sync {
    fn open(&self, pdf_path: &Path) -> Result<Box<dyn RasterDocument>, KontaktError>;

    /// Name of this rasterization backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Cut `ratio` of the width off the right edge. Height is unchanged.
///
/// The new width is `floor(width * (1 - ratio))`, but never less than one
/// pixel so the recognizer always receives a valid image.
pub fn crop_right_margin(image: &DynamicImage, ratio: f64) -> DynamicImage {
    if ratio <= 0.0 {
        return image.clone();
    }
    let width = image.width();
    let kept = ((width as f64) * (1.0 - ratio)).floor() as u32;
    image.crop_imm(0, 0, kept.clamp(1, width.max(1)), image.height())
}
