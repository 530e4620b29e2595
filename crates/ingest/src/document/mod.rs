mod docx;
pub mod ocr;
pub mod pdf;

use thiserror::Error;
use tracing::{info, warn};

use tenderlens_core::config::OcrConfig;
use tenderlens_core::{Document, DocumentKind};

use self::ocr::{OcrEngine, TesseractOcr};
use self::pdf::{PdfExtractSource, PdfTextSource};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Text objects read straight from the PDF.
    Structured,
    /// Page images run through OCR.
    Ocr,
    /// DOCX paragraphs.
    Paragraphs,
    /// Unsupported type; nothing was read.
    None,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Structured => "structured",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Paragraphs => "paragraphs",
            ExtractionMethod::None => "none",
        }
    }
}

/// Best-effort plain text of one document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    /// Pages seen, for PDFs.
    pub page_count: Option<usize>,
}

impl ExtractedText {
    pub fn empty(method: ExtractionMethod) -> Self {
        Self {
            text: String::new(),
            method,
            page_count: None,
        }
    }

    /// True when there is nothing but whitespace to analyze.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Turns uploaded documents into text: structured parsing first, OCR for PDFs
/// that yield nothing.
pub struct TextExtractor {
    pdf: Box<dyn PdfTextSource>,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(ocr: Box<dyn OcrEngine>) -> Self {
        Self {
            pdf: Box::new(PdfExtractSource),
            ocr,
        }
    }

    /// Extractor backed by pdf-extract and the configured tesseract toolchain.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(Box::new(TesseractOcr::new(config.clone())))
    }

    /// Replace the structured PDF text source.
    pub fn with_pdf_source(mut self, source: Box<dyn PdfTextSource>) -> Self {
        self.pdf = source;
        self
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_available()
    }

    /// Extract text from a document based on its declared type.
    ///
    /// PDF failures are absorbed (an unreadable PDF yields empty text).
    /// DOCX failures are returned to the caller. Unsupported types yield
    /// empty text.
    pub fn extract(&self, doc: &Document) -> Result<ExtractedText, ExtractionError> {
        let extracted = match &doc.kind {
            DocumentKind::Pdf => pdf::extract_pdf(self.pdf.as_ref(), self.ocr.as_ref(), &doc.bytes),
            DocumentKind::Docx => ExtractedText {
                text: docx::extract_docx(&doc.bytes)?,
                method: ExtractionMethod::Paragraphs,
                page_count: None,
            },
            DocumentKind::Unsupported(ext) => {
                warn!(file = %doc.filename, ext = %ext, "Unsupported document type, no text extracted");
                ExtractedText::empty(ExtractionMethod::None)
            }
        };

        info!(
            file = %doc.filename,
            method = extracted.method.as_str(),
            chars = extracted.text.len(),
            "Document text extracted"
        );
        Ok(extracted)
    }
}
