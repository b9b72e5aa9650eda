//! Resume text extraction for uploaded files.
//!
//! PDF parsing is CPU-bound and may panic on hostile input, so it runs inside
//! `tokio::task::spawn_blocking` and a panic surfaces as `ExtractError::Pdf`.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported resume format '{0}': upload a PDF or plain text file")]
    Unsupported(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Resume contains no extractable text")]
    Empty,
}

enum ResumeFormat {
    Pdf,
    PlainText,
}

/// Extracts plain text from an uploaded resume.
pub async fn extract_resume_text(
    data: Bytes,
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<String, ExtractError> {
    let text = match detect_format(&data, content_type, file_name)? {
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::Pdf(format!("extraction aborted: {e}")))??,
        ResumeFormat::PlainText => String::from_utf8_lossy(&data).into_owned(),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    debug!("Extracted {} characters of resume text", text.len());
    Ok(text)
}

fn detect_format(
    data: &[u8],
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<ResumeFormat, ExtractError> {
    if data.starts_with(b"%PDF") {
        return Ok(ResumeFormat::Pdf);
    }
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if content_type == "application/pdf" || extension == "pdf" {
        Ok(ResumeFormat::Pdf)
    } else if content_type.starts_with("text/plain") || extension == "txt" {
        Ok(ResumeFormat::PlainText)
    } else if content_type.is_empty() {
        Err(ExtractError::Unsupported(if extension.is_empty() {
            "unknown".to_string()
        } else {
            extension
        }))
    } else {
        Err(ExtractError::Unsupported(content_type))
    }
}
