use crate::error::KontaktError;
use crate::model::ColumnSelection;
use crate::raster::Rotation;
use std::path::PathBuf;

pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DPI: u32 = 200;
pub const DEFAULT_CROP_RATIO: f64 = 0.05;

/// Validated settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub rotation: Rotation,
    /// Share of the page width cut off the right edge, in `[0, 1)`.
    pub crop_ratio: f64,
    pub dpi: u32,
    pub columns: ColumnSelection,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rotation: Rotation::None,
            crop_ratio: DEFAULT_CROP_RATIO,
            dpi: DEFAULT_DPI,
            columns: ColumnSelection::all(),
        }
    }
}

impl BatchConfig {
    /// Build a config from raw option values, rejecting out-of-range ones.
    pub fn from_options(
        input_dir: PathBuf,
        output_dir: PathBuf,
        rotate_degrees: u16,
        crop_ratio: f64,
        dpi: u32,
        columns: &str,
    ) -> Result<Self, KontaktError> {
        let config = BatchConfig {
            input_dir,
            output_dir,
            rotation: Rotation::try_from(rotate_degrees)?,
            crop_ratio,
            dpi,
            columns: columns.parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), KontaktError> {
        if !(0.0..1.0).contains(&self.crop_ratio) {
            return Err(KontaktError::InvalidCropRatio(self.crop_ratio));
        }
        if self.dpi == 0 {
            return Err(KontaktError::InvalidDpi(self.dpi));
        }
        Ok(())
    }
}
