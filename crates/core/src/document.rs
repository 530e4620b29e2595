use serde::{Deserialize, Serialize};

/// Declared type of an uploaded document, taken from its file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Anything else; carries the lowercased extension (may be empty).
    Unsupported(String),
}

impl DocumentKind {
    /// Classify a filename by its extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        };
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Unsupported(ext),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Unsupported(ext) => ext.as_str(),
        }
    }
}

/// An uploaded file: raw bytes plus its declared type.
///
/// Consumed once by the extractor and then dropped.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename);
        Self {
            filename,
            kind,
            bytes,
        }
    }

    /// Read a document from disk, classifying it by the path's file name.
    pub fn read(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(DocumentKind::from_filename("book.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("Book.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("specs.v2.docx"), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::from_filename("notes.txt"),
            DocumentKind::Unsupported("txt".into())
        );
        assert_eq!(
            DocumentKind::from_filename("README"),
            DocumentKind::Unsupported(String::new())
        );
    }

    #[test]
    fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tender.docx");
        std::fs::write(&path, b"PK").unwrap();

        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.filename, "tender.docx");
        assert_eq!(doc.kind, DocumentKind::Docx);
        assert_eq!(doc.bytes, b"PK");
    }
}
