//! Page count resolution via qpdf

use super::PdfHandle;
use crate::error::{Error, Result};
use qpdf::QPdf;

fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::PdfInfo {
        reason: e.to_string(),
    }
}

/// Total number of pages in the document.
///
/// Re-derived on every call; nothing is cached between requests.
pub fn page_count(pdf: &PdfHandle) -> Result<u32> {
    let qpdf = match pdf {
        PdfHandle::Path(path) => QPdf::read(path),
        PdfHandle::Bytes(data) => QPdf::read_from_memory(data),
    }
    .map_err(map_qpdf_error)?;

    qpdf.get_num_pages().map_err(map_qpdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::minimal_pdf;
    use std::io::Write;

    #[test]
    fn test_page_count_from_bytes() {
        let pdf = PdfHandle::Bytes(minimal_pdf(3));
        assert_eq!(page_count(&pdf).unwrap(), 3);
    }

    #[test]
    fn test_page_count_from_path() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&minimal_pdf(2)).unwrap();
        let pdf = PdfHandle::Path(file.path().to_path_buf());
        assert_eq!(page_count(&pdf).unwrap(), 2);
    }

    #[test]
    fn test_page_count_invalid_bytes() {
        let pdf = PdfHandle::Bytes(b"not a pdf at all".to_vec());
        assert!(matches!(page_count(&pdf), Err(Error::PdfInfo { .. })));
    }

    #[test]
    fn test_page_count_missing_path() {
        let pdf = PdfHandle::Path("/nonexistent/path/file.pdf".into());
        assert!(page_count(&pdf).is_err());
    }
}
