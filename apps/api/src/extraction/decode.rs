//! Document decoding: uploaded résumé bytes → plain text.
//! Supports: PDF, DOCX (and `.doc` routed through the DOCX reader), TXT.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported file format. Use PDF, DOCX, or TXT.")]
    UnsupportedFormat(String),

    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("Failed to extract DOCX text: {0}")]
    Docx(String),

    #[error("Invalid UTF-8 content: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decodes `bytes` by the extension of `file_name`. A name with no extension is
/// read as plain text.
pub fn decode_document(file_name: &str, bytes: &[u8]) -> Result<String, DecodeError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    info!("Decoding résumé upload {} (type: {})", file_name, extension);

    match extension.as_str() {
        "pdf" => decode_pdf(bytes),
        "docx" | "doc" => decode_docx(bytes),
        "txt" | "" => Ok(clean_extracted_text(&String::from_utf8(bytes.to_vec())?)),
        other => Err(DecodeError::UnsupportedFormat(other.to_string())),
    }
}

fn decode_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!("PDF extraction failed: {}", e);
        DecodeError::Pdf(e.to_string())
    })?;
    let cleaned = clean_extracted_text(&text);
    info!("PDF decoded: {} characters", cleaned.len());
    Ok(cleaned)
}

fn decode_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| {
        warn!("DOCX extraction failed: {}", e);
        DecodeError::Docx(e.to_string())
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    let cleaned = clean_extracted_text(&paragraphs.join("\n"));
    info!("DOCX decoded: {} characters", cleaned.len());
    Ok(cleaned)
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|child| match child {
            docx_rs::ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
        .flat_map(|run| run.children.iter())
        .filter_map(|child| match child {
            docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

/// Trims every line and drops blank ones.
pub fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_decoding() {
        let text = decode_document("resume.txt", b"  Jane Doe  \n\n Skills \n").unwrap();
        assert_eq!(text, "Jane Doe\nSkills");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(decode_document("RESUME.TXT", b"Jane").is_ok());
    }

    #[test]
    fn test_no_extension_reads_as_text() {
        assert_eq!(decode_document("resume", b"Jane Doe").unwrap(), "Jane Doe");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = decode_document("photo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ref ext) if ext == "png"));
        assert_eq!(err.to_string(), "Unsupported file format. Use PDF, DOCX, or TXT.");
    }

    #[test]
    fn test_invalid_utf8_text() {
        let err = decode_document("resume.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let err = decode_document("resume.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));
    }

    #[test]
    fn test_corrupt_docx_is_an_error() {
        let err = decode_document("resume.docx", b"not a zip").unwrap_err();
        assert!(matches!(err, DecodeError::Docx(_)));
    }

    #[test]
    fn test_unicode_text_survives() {
        let text = decode_document("cv.txt", "José Núñez\nRésumé".as_bytes()).unwrap();
        assert!(text.contains("Núñez"));
        assert!(text.contains("Résumé"));
    }
}
