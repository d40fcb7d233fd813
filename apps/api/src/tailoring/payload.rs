//! Shape checks for uploaded documents.
//!
//! Documents arrive as data URIs (`data:<mime>;base64,<data>`). Only the header and
//! the encoded length are inspected; the content itself is never decoded.

/// MIME types accepted for resumes and cover letters.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Largest document accepted, in decoded bytes.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Checks that `payload` is a base64 data URI of an accepted type and size.
/// `label` names the document in the error message.
pub fn check_encoded_document(label: &str, payload: &str) -> Result<(), String> {
    let rest = payload
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| format!("{label} must be a data URI (data:<mimetype>;base64,<data>)"))?;

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| format!("{label} data URI has no data section"))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| format!("{label} must be base64 encoded"))?;
    // Parameters such as `;charset=utf-8` may precede `;base64`.
    let mime = mime.split(';').next().unwrap_or_default().trim();

    if !ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime))
    {
        return Err(format!(
            "{label} has unsupported type '{mime}'. .pdf, .doc, .docx, and .txt files are accepted."
        ));
    }

    if data.trim().is_empty() {
        return Err(format!("{label} is empty"));
    }

    if estimated_decoded_len(data) > MAX_DOCUMENT_BYTES {
        return Err(format!("{label} exceeds the maximum file size of 5MB"));
    }

    Ok(())
}

/// Decoded size of a base64 string, from its length and padding alone.
fn estimated_decoded_len(data: &str) -> usize {
    let data = data.trim();
    let padding = data.bytes().rev().take_while(|b| *b == b'=').count();
    (data.len() / 4 * 3 + (data.len() % 4) * 3 / 4).saturating_sub(padding)
}
