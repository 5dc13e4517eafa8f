//! Document extraction: turns an uploaded résumé file into plain text.
//!
//! Supported: pdf (pdf-extract), docx (zip + quick-xml over word/document.xml), txt (UTF-8).

pub mod docx;

use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves the format from the file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self, AppError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            "" => Err(AppError::UnsupportedFormat(format!(
                "'{file_name}' has no extension (expected pdf, docx or txt)"
            ))),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Extracts plain text from an uploaded file.
///
/// Unsupported extensions fail before the bytes are inspected. Any failure inside a
/// format reader, and a document that yields no text at all, come back as `Extraction`.
/// Readers run on the blocking pool; pdf-extract panics on some valid files, and a
/// panicked reader is reported like any other extraction failure.
pub async fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    let format = DocumentFormat::from_file_name(file_name)?;

    let owned = bytes.to_vec();
    let text = tokio::task::spawn_blocking(move || read_text(format, &owned))
        .await
        .map_err(|e| {
            warn!("{format:?} reader failed on {file_name}: {e}");
            AppError::Extraction(format!("could not read '{file_name}'"))
        })??;

    if text.trim().is_empty() {
        warn!("No text extracted from {file_name} ({format:?})");
        return Err(AppError::Extraction(format!(
            "no text could be extracted from '{file_name}'"
        )));
    }

    debug!("Extracted {} chars from {file_name} ({format:?})", text.len());
    Ok(text)
}

fn read_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, AppError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("could not read PDF: {e}"))),
        DocumentFormat::Docx => docx::extract_docx_text(bytes),
        DocumentFormat::Txt => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Extraction(format!("text file is not valid UTF-8: {e}"))),
    }
}
