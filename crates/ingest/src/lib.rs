pub mod document;
pub mod language;

pub use document::ocr::{OcrEngine, OcrError, PageImage, RenderedPages, TesseractOcr};
pub use document::pdf::{PdfExtractSource, PdfTextSource};
pub use document::{ExtractedText, ExtractionError, ExtractionMethod, TextExtractor};
pub use language::{detect_language, UNKNOWN_LANGUAGE};
