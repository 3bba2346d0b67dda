//! PDF text extraction using lopdf and pdf-extract.

use std::fs::File;
use std::io::Read;
use std::panic;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf, with pdf-extract as a whole-document fallback.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Whole-document text via pdf-extract.
    ///
    /// pdf-extract panics on some malformed inputs, so the call is isolated.
    fn extract_text_fallback(&self) -> Result<String> {
        let data = self.raw_data.as_slice();
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(result) => result.map_err(|e| PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction(
                "pdf-extract panicked on this document".to_string(),
            )),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        let mut text = String::new();
        // get_pages is keyed by page number, so iteration follows document order
        for page_num in doc.get_pages().keys() {
            match self.extract_page_text(*page_num) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => debug!("No text layer on page {}: {}", page_num, e),
            }
        }

        if text.trim().is_empty() {
            debug!("lopdf produced no text, falling back to pdf-extract");
            return self.extract_text_fallback();
        }

        trace!("Extracted {} chars from {} pages", text.len(), self.page_count());
        Ok(text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Read a PDF from disk and return its text layer.
fn read_pdf_text(path: &Path) -> Result<String> {
    let data = {
        let mut file = File::open(path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        buf
    };

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;
    extractor.extract_text()
}

/// Extract the text of a PDF, or an empty string if it cannot be read.
///
/// Missing files, unparseable documents and scanned PDFs without a text
/// layer all yield `""`; the reason is logged at WARN level.
pub fn extract_text_or_empty(path: &Path) -> String {
    match read_pdf_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read PDF {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Load document text from a path.
///
/// `.txt` files are taken as already-extracted text (invalid UTF-8 is
/// replaced); anything else goes through [`extract_text_or_empty`].
pub fn read_text_or_empty(path: &Path) -> String {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    if !is_text {
        return extract_text_or_empty(path);
    }

    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Failed to read text file {}: {}", path.display(), e);
            String::new()
        }
    }
}
