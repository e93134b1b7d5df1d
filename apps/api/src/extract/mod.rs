//! Plain-text extraction from uploaded resume files.
//!
//! PDF goes through `pdf-extract`; DOCX is a ZIP whose `word/document.xml`
//! is walked for text runs. Other formats carry no extractable text.

pub(crate) mod docx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive unreadable: {0}")]
    DocxArchive(#[from] zip::result::ZipError),

    #[error("DOCX XML malformed: {0}")]
    DocxXml(#[from] quick_xml::Error),

    #[error("I/O error while reading document: {0}")]
    Io(#[from] std::io::Error),
}

/// Document formats recognized from MIME type or file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Legacy binary Word (.doc); accepted but not parsed.
    LegacyDoc,
    Unknown,
}

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";

impl DocumentKind {
    /// MIME type wins when it is specific; otherwise the extension decides.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Self {
        let mime = content_type
            .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase());
        match mime.as_deref() {
            Some(PDF_MIME) => return DocumentKind::Pdf,
            Some(DOCX_MIME) => return DocumentKind::Docx,
            Some(DOC_MIME) => return DocumentKind::LegacyDoc,
            _ => {}
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            Some("doc") => DocumentKind::LegacyDoc,
            _ => DocumentKind::Unknown,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
            DocumentKind::LegacyDoc => DOC_MIME,
            DocumentKind::Unknown => "application/octet-stream",
        }
    }
}

/// Extracts plain text. Returns `Ok(None)` for formats without an extractor.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<Option<String>, ExtractError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::Docx => docx::extract_docx_text(bytes)?,
        DocumentKind::LegacyDoc | DocumentKind::Unknown => return Ok(None),
    };
    Ok(Some(normalize_whitespace(&text)))
}

/// Trims each line, drops trailing spaces, and collapses runs of blank lines.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_end().to_string()
}
