//! Text extraction — turns an uploaded resume (PDF or DOCX) into plain text.
//!
//! Text-layer extraction only: no OCR, no layout reconstruction. A document
//! with no text layer yields an empty string, not an error.

use std::io::Read;

use quick_xml::events::Event;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// Supported resume document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from a filename extension or a declared MIME type.
    /// Extension wins when both are present.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Result<Self, ExtractError> {
        if let Some(name) = filename {
            let lower = name.to_lowercase();
            if lower.ends_with(".pdf") {
                return Ok(DocumentFormat::Pdf);
            }
            if lower.ends_with(".docx") {
                return Ok(DocumentFormat::Docx);
            }
        }
        match content_type {
            Some("application/pdf") => Ok(DocumentFormat::Pdf),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Ok(DocumentFormat::Docx)
            }
            _ => Err(ExtractError::UnsupportedFormat(
                filename
                    .or(content_type)
                    .unwrap_or("<unknown>")
                    .to_string(),
            )),
        }
    }
}

/// Extracts the full text content of a document, dispatched on format.
///
/// PDF: page text concatenated in page order. DOCX: paragraph text joined by
/// newlines in document order. Only the final result is trimmed.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
    };
    debug!("Extracted {} chars from {:?} document", text.len(), format);
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Parse(format!("PDF: {e}")))?;
    Ok(text.trim().to_string())
}

/// Reads `word/document.xml` out of the DOCX zip container and pulls the text
/// runs, closing each `w:p` paragraph with a newline.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractError::Parse(format!("DOCX: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Parse(format!("DOCX: missing document.xml ({e})")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Parse(format!("DOCX: {e}")))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut out = String::new();
    // Text content lives in w:t runs; whitespace between other tags is markup.
    let mut in_text_run = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_text_run = false,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => out.push('\n'),
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Parse(format!("DOCX: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Parse(format!("DOCX: {e}"))),
            _ => {}
        }
    }

    Ok(out.trim().to_string())
}
