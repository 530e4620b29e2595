//! DOCX paragraph extraction.
//!
//! A DOCX file is a ZIP package; the body lives in `word/document.xml` as
//! WordprocessingML. Each `<w:p>` is a paragraph whose text is the
//! concatenation of its `<w:t>` runs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Non-empty paragraphs in document order, one per line.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("not a DOCX package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::DocxError(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    let paragraphs = paragraphs_from_xml(&xml)?;
    Ok(paragraphs
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Every body paragraph's text, empty ones included.
///
/// Tabs become `\t`; line breaks inside a paragraph become a space so that a
/// paragraph always maps to exactly one output line. Only run content counts,
/// so tab stops declared in `w:pPr` add nothing. Paragraphs nested inside
/// another paragraph (text boxes) are skipped, and `mc:Fallback` copies of
/// alternate content are ignored entirely.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut para_depth = 0usize;
    let mut run_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ExtractionError::DocxError(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        };

        if fallback_depth > 0 {
            match &event {
                Event::Start(e) if e.name().as_ref() == b"mc:Fallback" => fallback_depth += 1,
                Event::End(e) if e.name().as_ref() == b"mc:Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        // Text belongs to the outermost paragraph only, and only inside a run.
        let collecting = para_depth == 1 && run_depth > 0;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth += 1,
                b"w:p" => {
                    para_depth += 1;
                    if para_depth == 1 {
                        current.clear();
                    }
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = collecting,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if para_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if collecting => current.push('\t'),
                b"w:br" | b"w:cr" if collecting => current.push(' '),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| {
                    ExtractionError::DocxError(format!("bad text at byte {}: {e}", reader.buffer_position()))
                })?;
                current.push_str(&text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:p" => {
                    para_depth = para_depth.saturating_sub(1);
                    if para_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{paragraphs}</w:body></w:document>"#
        )
    }

    fn docx_with(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_in_order_one_per_line() {
        let xml = body(
            "<w:p><w:r><w:t>Project Book</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Location: </w:t></w:r><w:r><w:t>Riyadh</w:t></w:r></w:p>\
             <w:p><w:r><w:t>CD attached</w:t></w:r></w:p>",
        );
        let text = extract_docx(&docx_with(&xml)).unwrap();
        assert_eq!(text, "Project Book\nLocation: Riyadh\nCD attached");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let xml = body(
            "<w:p><w:r><w:t>First</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr></w:p>\
             <w:p><w:r><w:t>Second</w:t></w:r></w:p>",
        );
        let text = extract_docx(&docx_with(&xml)).unwrap();
        assert_eq!(text, "First\nSecond");
    }

    #[test]
    fn breaks_and_tabs_stay_on_one_line() {
        let xml = body(
            "<w:p><w:r><w:t>Item</w:t><w:tab/><w:t>Qty</w:t><w:br/><w:t>continued</w:t></w:r></w:p>",
        );
        let text = extract_docx(&docx_with(&xml)).unwrap();
        assert_eq!(text, "Item\tQty continued");
    }

    #[test]
    fn text_box_counted_once_and_not_as_a_line() {
        let xml = body(
            "<w:p><w:r><w:t xml:space=\"preserve\">Before </w:t></w:r>\
             <w:r><mc:AlternateContent>\
               <mc:Choice Requires=\"wps\"><w:drawing><wps:txbx><w:txbxContent>\
                 <w:p><w:r><w:t>BOX</w:t></w:r></w:p>\
               </w:txbxContent></wps:txbx></w:drawing></mc:Choice>\
               <mc:Fallback><w:pict><v:textbox><w:txbxContent>\
                 <w:p><w:r><w:t>BOX</w:t></w:r></w:p>\
               </w:txbxContent></v:textbox></w:pict></mc:Fallback>\
             </mc:AlternateContent></w:r>\
             <w:r><w:t>After</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Next</w:t></w:r></w:p>",
        );
        let paragraphs = paragraphs_from_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["Before After", "Next"]);
    }

    #[test]
    fn tab_stop_definitions_are_not_text() {
        let xml = body(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/><w:tab w:val=\"right\" w:pos=\"9000\"/></w:tabs></w:pPr>\
             <w:r><w:t>Scope of Works</w:t></w:r></w:p>",
        );
        let text = extract_docx(&docx_with(&xml)).unwrap();
        assert_eq!(text, "Scope of Works");
    }

    #[test]
    fn entities_and_arabic_text() {
        let xml = body(
            "<w:p><w:r><w:t>Steel &amp; concrete</w:t></w:r></w:p>\
             <w:p><w:r><w:t>الموقع: الرياض</w:t></w:r></w:p>",
        );
        let text = extract_docx(&docx_with(&xml)).unwrap();
        assert_eq!(text, "Steel & concrete\nالموقع: الرياض");
    }

    #[test]
    fn missing_document_part_is_error() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = extract_docx(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[test]
    fn malformed_xml_is_error() {
        let bytes = docx_with("<w:document><w:body><w:p><w:t>open</w:body>");
        assert!(matches!(
            extract_docx(&bytes),
            Err(ExtractionError::DocxError(_))
        ));
    }
}
