//! PDF layer
//!
//! Page counting goes through qpdf, rasterization through PDFium. Both accept
//! a [`PdfHandle`], the canonical intermediate every document-like input is
//! lowered to before pagination.

mod info;
mod raster;

pub use info::page_count;
pub use raster::{pdfium_available, rasterize};

use std::path::PathBuf;

/// A PDF held either in memory or on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfHandle {
    /// In-memory PDF bytes, e.g. the output of HTML conversion
    Bytes(Vec<u8>),
    /// PDF file on disk; never loaded into memory by this crate
    Path(PathBuf),
}

impl PdfHandle {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            PdfHandle::Bytes(data) => format!("<{} bytes>", data.len()),
            PdfHandle::Path(path) => path.display().to_string(),
        }
    }
}

impl From<Vec<u8>> for PdfHandle {
    fn from(data: Vec<u8>) -> Self {
        PdfHandle::Bytes(data)
    }
}

impl From<PathBuf> for PdfHandle {
    fn from(path: PathBuf) -> Self {
        PdfHandle::Path(path)
    }
}

/// Build a minimal uncompressed PDF with `pages` blank 200x300pt pages.
///
/// Fixture for tests and benchmarks.
#[doc(hidden)]
pub fn minimal_pdf(pages: usize) -> Vec<u8> {
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", i + 3)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages
        ),
    ];
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 300] >>".to_string());
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(PdfHandle::Bytes(vec![0; 12]).describe(), "<12 bytes>");
        assert_eq!(
            PdfHandle::Path(PathBuf::from("/tmp/a.pdf")).describe(),
            "/tmp/a.pdf"
        );
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(PdfHandle::from(vec![1, 2]), PdfHandle::Bytes(vec![1, 2]));
        assert_eq!(
            PdfHandle::from(PathBuf::from("/tmp/a.pdf")),
            PdfHandle::Path(PathBuf::from("/tmp/a.pdf"))
        );
    }

    #[test]
    fn test_minimal_pdf_header() {
        let pdf = minimal_pdf(2);
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
    }
}
