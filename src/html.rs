//! HTML to PDF lowering
//!
//! HTML is never rasterized directly. It is typeset to PDF bytes first and
//! then paginated like any other PDF.

use crate::error::{Error, Result};
use crate::pdf::PdfHandle;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Converts HTML markup to PDF bytes
pub trait HtmlTypesetter: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Whether the typesetter can run in this environment
    fn is_available(&self) -> bool;

    /// Typeset `html` into PDF bytes. Blocking and CPU-bound.
    fn render(&self, html: &str, presentational_hints: bool) -> Result<Vec<u8>>;
}

/// WeasyPrint command-line typesetter
#[derive(Debug, Clone)]
pub struct WeasyPrint {
    binary: String,
}

impl WeasyPrint {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn unavailable(&self) -> Error {
        Error::TypesetterUnavailable {
            binary: self.binary.clone(),
        }
    }
}

impl Default for WeasyPrint {
    fn default() -> Self {
        Self::new("weasyprint")
    }
}

impl HtmlTypesetter for WeasyPrint {
    fn name(&self) -> &str {
        &self.binary
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn render(&self, html: &str, presentational_hints: bool) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.binary);
        if presentational_hints {
            cmd.arg("--presentational-hints");
        }
        // Read HTML from stdin, write PDF to stdout
        cmd.arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => self.unavailable(),
            _ => Error::TypesetterFailed {
                reason: format!("failed to start {}: {}", self.binary, e),
            },
        })?;

        // Feed stdin from its own thread so a full stdout pipe cannot deadlock us
        let writer = child.stdin.take().map(|mut stdin| {
            let input = html.to_owned();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::TypesetterFailed {
                reason: stderr.trim().to_string(),
            });
        }

        if let Some(handle) = writer {
            handle.join().map_err(|_| Error::TaskJoin {
                reason: "stdin writer panicked".to_string(),
            })??;
        }

        if output.stdout.is_empty() {
            return Err(Error::TypesetterFailed {
                reason: format!("{} produced no output", self.binary),
            });
        }

        Ok(output.stdout)
    }
}

/// Convert HTML to PDF on the blocking thread pool.
///
/// Presentational hints (inline styles and attributes) are always honoured.
/// Failures are returned to the caller rather than degraded to text.
pub async fn convert_html_to_pdf(
    typesetter: Arc<dyn HtmlTypesetter>,
    html: String,
) -> Result<PdfHandle> {
    let pdf = tokio::task::spawn_blocking(move || typesetter.render(&html, true))
        .await
        .map_err(|e| Error::TaskJoin {
            reason: e.to_string(),
        })??;

    tracing::debug!(bytes = pdf.len(), "Converted HTML to PDF");
    Ok(pdf.into())
}
