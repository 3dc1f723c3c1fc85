use crate::error::KontaktError;
use crate::raster::{PageRasterizer, RasterDocument, Rotation};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// PDF rasterization backend using poppler-utils.
///
/// `pdfinfo` reports the page count and `pdftoppm` renders one page at a
/// time into a scratch directory owned by the opened document.
pub struct PopplerRasterizer;

impl PopplerRasterizer {
    pub fn new() -> Self {
        PopplerRasterizer
    }

    /// Check if pdftoppm is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn open(&self, pdf_path: &Path) -> Result<Box<dyn RasterDocument>, KontaktError> {
        let output = run_tool("pdfinfo", Command::new("pdfinfo").arg(pdf_path))?;
        let info = String::from_utf8_lossy(&output.stdout);
        let page_count = parse_page_count(&info).ok_or_else(|| {
            KontaktError::Render(format!(
                "pdfinfo did not report a page count for {}",
                pdf_path.display()
            ))
        })?;

        let scratch = tempfile::Builder::new().prefix("kontakt-render").tempdir()?;

        Ok(Box::new(PopplerDocument {
            pdf_path: pdf_path.to_path_buf(),
            page_count,
            scratch,
        }))
    }

    fn backend_name(&self) -> &str {
        "poppler"
    }
}

struct PopplerDocument {
    pdf_path: PathBuf,
    page_count: usize,
    scratch: TempDir,
}

impl RasterDocument for PopplerDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(
        &self,
        page_number: usize,
        rotation: Rotation,
        dpi: u32,
    ) -> Result<DynamicImage, KontaktError> {
        if page_number == 0 || page_number > self.page_count {
            return Err(KontaktError::Render(format!(
                "page {page_number} out of range (document has {} pages)",
                self.page_count
            )));
        }

        let prefix = self.scratch.path().join(format!("page_{page_number:04}"));
        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .args(pdftoppm_args(page_number, dpi))
                .arg(&self.pdf_path)
                .arg(&prefix),
        )?;

        let image_path = prefix.with_extension("png");
        let image = image::open(&image_path)?;
        // The scratch dir lives as long as the document; drop pages as we go.
        if let Err(e) = std::fs::remove_file(&image_path) {
            log::debug!("could not remove {}: {e}", image_path.display());
        }

        Ok(rotation.apply(image))
    }
}

/// Options for rendering a single page. `-singlefile` makes pdftoppm
/// write exactly `<prefix>.png`.
fn pdftoppm_args(page_number: usize, dpi: u32) -> Vec<String> {
    let page = page_number.to_string();
    vec![
        "-png".into(),
        "-r".into(),
        dpi.to_string(),
        "-f".into(),
        page.clone(),
        "-l".into(),
        page,
        "-singlefile".into(),
    ]
}

fn run_tool(tool: &'static str, command: &mut Command) -> Result<Output, KontaktError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KontaktError::PopplerNotFound(tool)
        } else {
            KontaktError::Render(format!("{tool} failed: {e}"))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(KontaktError::ToolFailed { tool, code, stderr });
    }

    Ok(output)
}

/// Read the `Pages:` entry from `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines().find_map(|line| {
        let rest = line.strip_prefix("Pages:")?;
        rest.trim().parse().ok()
    })
}
