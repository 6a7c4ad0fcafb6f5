//! Content extraction for knowledge files
//!
//! Pure functions that turn a stored document into plain text for prompt
//! assembly. PDF files are extracted page by page; everything else is
//! decoded as UTF-8 with a single Latin-1 fallback, which covers the
//! Windows-generated CSV exports customers tend to upload.
//!
//! Extraction never fails the caller: an unreadable file contributes the
//! empty string and is logged.

use crate::error::{QuotegenError, Result};
use std::path::Path;

/// Extract the text content of a knowledge file
///
/// Any unrecoverable read or parse error is logged at warn level and
/// yields an empty string, so a single bad file never aborts prompt
/// assembly.
///
/// # Arguments
///
/// * `path` - Path to the stored document
///
/// # Examples
///
/// ```no_run
/// use quotegen::knowledge::extract_content;
/// use std::path::Path;
///
/// let text = extract_content(Path::new("uploads/price_list.csv"));
/// ```
pub fn extract_content(path: &Path) -> String {
    match try_extract(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not read file {}: {}", path.display(), e);
            String::new()
        }
    }
}

fn try_extract(path: &Path) -> Result<String> {
    if is_pdf(path) {
        extract_pdf_text(path)
    } else {
        read_text_with_fallback(path)
    }
}

/// Whether the file extension indicates a PDF document
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Extract text from a PDF, page by page
///
/// Page texts are concatenated in order; a page with no extractable text
/// contributes the empty string rather than an error.
fn extract_pdf_text(path: &Path) -> Result<String> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| QuotegenError::Knowledge(format!("PDF extraction failed: {}", e)))?;
    Ok(pages.concat())
}

/// Read a text file, trying UTF-8 first and Latin-1 second
fn read_text_with_fallback(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::debug!(
                "UTF-8 failed for {}, trying Latin-1 encoding",
                path.display()
            );
            Ok(decode_latin1(&e.into_bytes()))
        }
    }
}

/// Decode bytes as Latin-1 (ISO-8859-1)
///
/// Latin-1 maps every byte directly to the Unicode scalar of the same
/// value, so this decoding is total.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
