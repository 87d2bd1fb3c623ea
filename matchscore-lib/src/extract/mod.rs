//! Raw text extraction from candidate documents
//!
//! Extraction quality varies by PDF (text layer vs scanned images); a scanned
//! resume simply produces no text, which the pipeline reports as a skip.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::{Error, Result};

/// Pulls raw, unnormalized text out of a file.
pub trait TextExtractor {
    fn extract(&mut self, path: &Path) -> Result<String>;
}

/// PDF text extraction via the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&mut self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

        // pdf-extract panics on some malformed documents instead of returning an error
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }));

        match extracted {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Error::Extraction {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => Err(Error::Extraction {
                path: path.to_path_buf(),
                message: "pdf parser panicked".to_string(),
            }),
        }
    }
}

/// Reads the file as UTF-8 text. Used for the job description.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&mut self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_desc.txt");
        fs::write(&path, "Senior backend engineer\n").unwrap();

        let text = PlainTextExtractor.extract(&path).unwrap();
        assert_eq!(text, "Senior backend engineer\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let err = PdfExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p == path));

        let err = PlainTextExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf at all").unwrap();

        let err = PdfExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }), "unexpected error: {err}");
    }
}
