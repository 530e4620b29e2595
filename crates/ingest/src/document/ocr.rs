//! OCR fallback for scanned PDFs.
//!
//! Pages are rendered to PNG with `pdftoppm` (poppler-utils) and each image
//! is read back with `tesseract`. Both binaries must be on `PATH` or named in
//! the OCR config.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

use tenderlens_core::config::OcrConfig;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR toolchain unavailable: {0}")]
    Unavailable(String),
    #[error("page rendering failed: {0}")]
    Render(String),
    #[error("recognition failed on page {page}: {reason}")]
    Recognition { page: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rendered page image, 1-based page number.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub page_number: usize,
    pub path: PathBuf,
}

/// Page images in page order. Owns the scratch directory they live in, so the
/// files stay around until this value is dropped.
#[derive(Debug)]
pub struct RenderedPages {
    pub pages: Vec<PageImage>,
    _workdir: Option<TempDir>,
}

impl RenderedPages {
    pub fn new(pages: Vec<PageImage>) -> Self {
        Self {
            pages,
            _workdir: None,
        }
    }

    fn in_workdir(pages: Vec<PageImage>, workdir: TempDir) -> Self {
        Self {
            pages,
            _workdir: Some(workdir),
        }
    }
}

/// Renders PDF pages to images and recognizes text on a single page image.
pub trait OcrEngine: Send + Sync {
    fn render_pages(&self, pdf_bytes: &[u8]) -> Result<RenderedPages, OcrError>;

    fn recognize(&self, page: &PageImage) -> Result<String, OcrError>;

    fn is_available(&self) -> bool {
        true
    }
}

/// `pdftoppm` + `tesseract` via subprocesses.
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn languages(&self) -> &str {
        &self.config.languages
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl OcrEngine for TesseractOcr {
    fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.config.pdftoppm_bin)
            .arg("-v")
            .output()
            .is_ok();
        let tesseract = Command::new(&self.config.tesseract_bin)
            .arg("--version")
            .output()
            .is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            debug!("tesseract not found - install tesseract-ocr for OCR support");
        }
        pdftoppm && tesseract
    }

    fn render_pages(&self, pdf_bytes: &[u8]) -> Result<RenderedPages, OcrError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        std::fs::write(&input, pdf_bytes)?;
        let prefix = workdir.path().join("page");

        let output = Command::new(&self.config.pdftoppm_bin)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| OcrError::Unavailable(format!("failed to run pdftoppm: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Render(format!("pdftoppm failed: {}", stderr.trim())));
        }

        let mut pages = Vec::new();
        for entry in std::fs::read_dir(workdir.path())? {
            let path = entry?.path();
            if let Some(page_number) = page_number_of(&path) {
                pages.push(PageImage { page_number, path });
            }
        }
        pages.sort_by_key(|p| p.page_number);

        if pages.is_empty() {
            return Err(OcrError::Render("pdftoppm produced no images".into()));
        }
        debug!(pages = pages.len(), dpi = self.config.dpi, "Rendered PDF pages for OCR");
        Ok(RenderedPages::in_workdir(pages, workdir))
    }

    fn recognize(&self, page: &PageImage) -> Result<String, OcrError> {
        let output = Command::new(&self.config.tesseract_bin)
            .arg(&page.path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.languages)
            .output()
            .map_err(|e| OcrError::Unavailable(format!("failed to run tesseract: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(page = page.page_number, "tesseract exited with an error");
            return Err(OcrError::Recognition {
                page: page.page_number,
                reason: stderr.trim().to_string(),
            });
        }

        // tesseract ends every page with a form feed.
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim_end_matches(['\n', '\x0C', ' ']).to_string())
    }
}

/// Page number from pdftoppm output names like `page-07.png`.
fn page_number_of(path: &Path) -> Option<usize> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (_, number) = stem.rsplit_once('-')?;
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_from_pdftoppm_names() {
        assert_eq!(page_number_of(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number_of(Path::new("/tmp/x/page-010.png")), Some(10));
        assert_eq!(page_number_of(Path::new("/tmp/x/input.pdf")), None);
        assert_eq!(page_number_of(Path::new("/tmp/x/page.png")), None);
    }

    #[test]
    fn missing_binaries_are_reported_unavailable() {
        let engine = TesseractOcr::new(OcrConfig {
            pdftoppm_bin: "tenderlens-no-such-pdftoppm".into(),
            tesseract_bin: "tenderlens-no-such-tesseract".into(),
            ..OcrConfig::default()
        });
        assert!(!engine.is_available());
        assert!(matches!(
            engine.render_pages(b"%PDF-1.4"),
            Err(OcrError::Unavailable(_))
        ));
        assert_eq!(engine.languages(), "ara+eng");
    }
}
