//! One user action end to end: extract, prompt, analyze, approve, export.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use tenderlens_core::{AnalysisFlow, Document, ReviewedSummary};
use tenderlens_ingest::{detect_language, ExtractedText, ExtractionError, TextExtractor};
use tenderlens_llm::{build_prompt, Analyzer, LlmError};
use tenderlens_report::ReportError;
use tenderlens_storage::{ConstraintStore, SessionConstraints, StoreError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No readable text found in the file.")]
    NoReadableText,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("analysis failed: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to save constraint: {0}")]
    Store(#[from] StoreError),
    #[error("export failed: {0}")]
    Report(#[from] ReportError),
}

/// Text ready for analysis, with its detected language for display.
#[derive(Debug)]
pub struct PreparedDocument {
    pub extracted: ExtractedText,
    pub language: String,
}

pub struct Pipeline {
    extractor: TextExtractor,
    store: Box<dyn ConstraintStore>,
}

impl Pipeline {
    pub fn new(extractor: TextExtractor, store: Box<dyn ConstraintStore>) -> Self {
        Self { extractor, store }
    }

    pub fn store(&self) -> &dyn ConstraintStore {
        self.store.as_ref()
    }

    /// Extract text, failing with `NoReadableText` when there is none.
    pub fn prepare(&self, doc: &Document) -> Result<PreparedDocument, PipelineError> {
        let extracted = self.extractor.extract(doc)?;
        if extracted.is_empty() {
            return Err(PipelineError::NoReadableText);
        }
        let language = detect_language(&extracted.text);
        info!(file = %doc.filename, language = %language, "Document ready for analysis");
        Ok(PreparedDocument {
            extracted,
            language,
        })
    }

    /// Persist a rule so it applies to this and every later analysis.
    pub fn save_constraint(&self, rule: &str) -> Result<(), PipelineError> {
        self.store.append(rule)?;
        Ok(())
    }

    /// Flow rules, then saved constraints, then this run's temporary ones.
    pub fn system_prompt(&self, flow: AnalysisFlow, session: &SessionConstraints) -> String {
        build_prompt(flow, flow.default_rules(), &self.store.load(), &session.as_text())
    }

    /// Ask the model for a summary; the result starts out pending approval.
    pub async fn analyze(
        &self,
        analyzer: &Analyzer,
        flow: AnalysisFlow,
        session: &SessionConstraints,
        prepared: &PreparedDocument,
    ) -> Result<ReviewedSummary, PipelineError> {
        let prompt = self.system_prompt(flow, session);
        let text = analyzer.analyze(&prompt, &prepared.extracted.text).await?;
        Ok(ReviewedSummary::new(flow, text))
    }
}

/// Write the workbook for an approved summary. Pending summaries are not
/// exported and yield `Ok(None)`.
pub fn export(summary: &ReviewedSummary, path: &Path) -> Result<Option<PathBuf>, PipelineError> {
    let Some(text) = summary.approved_text() else {
        return Ok(None);
    };
    tenderlens_report::write_summary(text, path)?;
    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use tenderlens_ingest::{OcrEngine, OcrError, PageImage, RenderedPages};
    use tenderlens_llm::{LlmProvider, Message};
    use tenderlens_storage::MemoryConstraintStore;

    use super::*;

    struct NoOcr;

    impl OcrEngine for NoOcr {
        fn render_pages(&self, _pdf_bytes: &[u8]) -> Result<RenderedPages, OcrError> {
            Err(OcrError::Unavailable("disabled in tests".into()))
        }

        fn recognize(&self, _page: &PageImage) -> Result<String, OcrError> {
            Err(OcrError::Unavailable("disabled in tests".into()))
        }
    }

    struct FixedPdf(&'static str);

    impl tenderlens_ingest::PdfTextSource for FixedPdf {
        fn page_texts(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            Ok(vec![self.0.to_string()])
        }
    }

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _m: Vec<Message>, _t: f32, _n: u32) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct OfflineProvider;

    #[async_trait]
    impl LlmProvider for OfflineProvider {
        async fn complete(&self, _m: Vec<Message>, _t: f32, _n: u32) -> Result<String, LlmError> {
            Err(LlmError::NotConfigured("network unreachable".into()))
        }
    }

    fn pipeline(pdf_text: &'static str) -> Pipeline {
        let extractor = TextExtractor::new(Box::new(NoOcr)).with_pdf_source(Box::new(FixedPdf(pdf_text)));
        Pipeline::new(extractor, Box::new(MemoryConstraintStore::new()))
    }

    fn book() -> Document {
        Document::new("book.pdf", b"%PDF".to_vec())
    }

    #[test]
    fn empty_document_has_no_readable_text() {
        let p = pipeline("   ");
        let err = p.prepare(&book()).unwrap_err();
        assert!(matches!(err, PipelineError::NoReadableText));
        assert_eq!(err.to_string(), "No readable text found in the file.");
    }

    #[test]
    fn unsupported_document_has_no_readable_text() {
        let p = pipeline("ignored");
        let doc = Document::new("drawing.dwg", vec![1, 2, 3]);
        assert!(matches!(p.prepare(&doc), Err(PipelineError::NoReadableText)));
    }

    #[test]
    fn prompt_orders_flow_saved_and_session_rules() {
        let p = pipeline("text");
        p.save_constraint("SAVED_RULE").unwrap();
        let session: SessionConstraints = ["SESSION_RULE"].into_iter().collect();

        let prompt = p.system_prompt(AnalysisFlow::Cost, &session);
        let flow_rule = AnalysisFlow::Cost.default_rules().lines().next().unwrap();
        let a = prompt.find(flow_rule).unwrap();
        let b = prompt.find("SAVED_RULE").unwrap();
        let c = prompt.find("SESSION_RULE").unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn analysis_is_pending_until_approved() {
        let p = pipeline("Project: Coastal Road");
        let prepared = p.prepare(&book()).unwrap();
        let analyzer = Analyzer::new(Box::new(CannedProvider("Location: Jazan\n\nWarnings: none")), 0.2, 128);

        let mut summary = p
            .analyze(&analyzer, AnalysisFlow::Cost, &SessionConstraints::new(), &prepared)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        assert!(export(&summary, &path).unwrap().is_none());
        assert!(!path.exists());

        summary.approve();
        assert_eq!(export(&summary, &path).unwrap(), Some(path.clone()));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn llm_failure_is_isolated() {
        let p = pipeline("Project: School Extension");
        p.save_constraint("Mention the CD").unwrap();
        let before = p.store().load();

        let prepared = p.prepare(&book()).unwrap();
        let analyzer = Analyzer::new(Box::new(OfflineProvider), 0.2, 128);
        let result = p
            .analyze(&analyzer, AnalysisFlow::Book, &SessionConstraints::new(), &prepared)
            .await;
        assert!(matches!(result, Err(PipelineError::Llm(_))));

        // Constraints untouched, extraction still works.
        assert_eq!(p.store().load(), before);
        assert_eq!(p.store().rules(), vec!["Mention the CD"]);
        assert!(p.prepare(&book()).is_ok());
    }
}
