//! Turns an uploaded PDF into plain text suitable for prompting.

use crate::error::ApiError;

/// Upload ceiling, enforced before parsing is attempted.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// Extract and normalize the text content of a PDF held in memory.
///
/// Fails with `ExtractionFailed` when the document parses but yields no
/// readable text (e.g. image-only scans), so callers can show an actionable
/// message instead of a generic parse error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ApiError> {
    if bytes.len() > MAX_PDF_BYTES {
        return Err(ApiError::FileTooLarge);
    }

    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ApiError::ExtractionFailed(e.to_string()))?;

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ApiError::ExtractionFailed(
            "PDF appears to be empty or contains no readable text".to_string(),
        ));
    }

    log::info!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}

/// Collapse runs of spaces/tabs to a single space and runs of 3+ newlines to
/// exactly two, trimming leading and trailing whitespace.
pub fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut newlines = 0usize;
    let mut pending_space = false;

    for ch in input.replace("\r\n", "\n").chars() {
        if ch == '\n' {
            newlines += 1;
            pending_space = false;
        } else if ch.is_whitespace() {
            if newlines == 0 {
                pending_space = true;
            }
        } else {
            if newlines > 0 {
                if !out.is_empty() {
                    for _ in 0..newlines.min(2) {
                        out.push('\n');
                    }
                }
                newlines = 0;
            } else if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out
}
