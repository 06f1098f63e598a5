//! Error types for the visual inspection server

use thiserror::Error;

/// Result type alias for the visual inspection server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the visual inspection server
#[derive(Error, Debug)]
pub enum Error {
    /// Path does not exist
    #[error("File not found at {path}")]
    FileNotFound { path: String },

    /// Path exists but is a directory or special file
    #[error("Path is not a file: {path}")]
    NotAFile { path: String },

    /// Path access denied (outside allowed resource directories)
    #[error("Access denied: {path} is outside the allowed directories")]
    PathAccessDenied { path: String },

    /// MIME type has no renderer
    #[error(
        "Unsupported file type '{mime_type}'. Only PDF, Images, and HTML are supported for visual inspection."
    )]
    UnsupportedMimeType { mime_type: String },

    /// Page numbers are 1-based
    #[error("Page number must be at least 1, got {page}.")]
    InvalidPageNumber { page: i64 },

    /// Maximum dimension must be a positive integer
    #[error("max_dimension must be a positive integer, got {value}.")]
    InvalidMaxDimension { value: i64 },

    /// Requested page exceeds the document's page count
    #[error("Page {page} does not exist. The document has {total} pages.")]
    PageOutOfRange { page: u32, total: u32 },

    /// Rasterizer returned no bitmap for an in-range page
    #[error("Could not render page {page}. The document might be empty or invalid.")]
    EmptyRender { page: u32 },

    /// Any rasterizer failure
    #[error("Failed to convert PDF to Image: {reason}")]
    PdfConversion { reason: String },

    /// qpdf failed to read the document structure
    #[error("Failed to read PDF info: {reason}")]
    PdfInfo { reason: String },

    /// PDFium library could not be bound
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Image decode or encode error
    #[error("{0}")]
    Image(#[from] image::ImageError),

    /// Output encoding derived from a MIME type the codec cannot write
    #[error("Unsupported output format: {format}")]
    UnsupportedOutputFormat { format: String },

    /// HTML typesetter is not installed
    #[error("{binary} is required for HTML rendering but was not found")]
    TypesetterUnavailable { binary: String },

    /// HTML typesetter ran but failed on this input
    #[error("HTML to PDF conversion failed: {reason}")]
    TypesetterFailed { reason: String },

    /// IO error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled
    #[error("Task join error: {reason}")]
    TaskJoin { reason: String },
}

impl Error {
    /// Errors detected from the request itself rather than from decoding.
    ///
    /// These are reported as `Error: <detail>` with no component prefix.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound { .. }
                | Error::NotAFile { .. }
                | Error::PathAccessDenied { .. }
                | Error::UnsupportedMimeType { .. }
                | Error::InvalidPageNumber { .. }
                | Error::InvalidMaxDimension { .. }
                | Error::PageOutOfRange { .. }
                | Error::EmptyRender { .. }
        )
    }

    /// Render the user-visible message, always prefixed with "Error".
    ///
    /// `context` names the component that failed, e.g. `"rendering image"`,
    /// and is only used for errors that are not input errors.
    pub fn user_message(&self, context: &str) -> String {
        if self.is_input_error() {
            format!("Error: {}", self)
        } else {
            format!("Error {}: {}", context, self)
        }
    }
}
