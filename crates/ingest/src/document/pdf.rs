use std::panic::{self, AssertUnwindSafe};

use tracing::{info, warn};

use super::ocr::OcrEngine;
use super::{ExtractedText, ExtractionError, ExtractionMethod};

/// Reads the embedded text of each PDF page, in page order.
pub trait PdfTextSource: Send + Sync {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Structured extraction with the pdf-extract crate.
pub struct PdfExtractSource;

impl PdfTextSource for PdfExtractSource {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed files; treat that as a failure.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::PdfError(e.to_string())),
            Err(_) => Err(ExtractionError::PdfError("pdf-extract panicked".into())),
        }
    }
}

/// Structured text first; OCR every page when that yields nothing or fails.
/// Never returns an error: the worst case is empty text.
pub(super) fn extract_pdf(source: &dyn PdfTextSource, ocr: &dyn OcrEngine, bytes: &[u8]) -> ExtractedText {
    match source.page_texts(bytes) {
        Ok(pages) => {
            let page_count = pages.len();
            let text = pages
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n");
            if !text.trim().is_empty() {
                return ExtractedText {
                    text,
                    method: ExtractionMethod::Structured,
                    page_count: Some(page_count),
                };
            }
            info!(pages = page_count, "PDF has no embedded text, falling back to OCR");
        }
        Err(e) => {
            warn!("Structured PDF extraction failed, falling back to OCR: {}", e);
        }
    }
    ocr_fallback(ocr, bytes)
}

fn ocr_fallback(ocr: &dyn OcrEngine, bytes: &[u8]) -> ExtractedText {
    if !ocr.is_available() {
        warn!("PDF has no text layer and OCR tools are not installed");
        return ExtractedText::empty(ExtractionMethod::Ocr);
    }
    let rendered = match ocr.render_pages(bytes) {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!("OCR fallback failed: {}", e);
            return ExtractedText::empty(ExtractionMethod::Ocr);
        }
    };

    let mut texts = Vec::with_capacity(rendered.pages.len());
    for page in &rendered.pages {
        match ocr.recognize(page) {
            Ok(text) => texts.push(text),
            Err(e) => warn!(page = page.page_number, "OCR skipped page: {}", e),
        }
    }

    info!(
        "PDF text extraction via OCR finished ({}/{} pages)",
        texts.len(),
        rendered.pages.len()
    );
    ExtractedText {
        text: texts.join("\n"),
        method: ExtractionMethod::Ocr,
        page_count: Some(rendered.pages.len()),
    }
}
