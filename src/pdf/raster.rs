//! Page rasterization via PDFium

use super::PdfHandle;
use crate::error::{Error, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Whether the PDFium shared library can be bound in this environment
pub fn pdfium_available() -> bool {
    create_pdfium().is_ok()
}

/// Rasterize the 1-based inclusive page range `[first_page, last_page]`.
///
/// Pages outside the document are skipped, so the result may be empty.
/// Every failure is reported as [`Error::PdfConversion`].
pub fn rasterize(
    pdf: &PdfHandle,
    first_page: u32,
    last_page: u32,
    dpi: f32,
) -> Result<Vec<DynamicImage>> {
    rasterize_range(pdf, first_page, last_page, dpi).map_err(|e| match e {
        Error::PdfConversion { .. } => e,
        other => Error::PdfConversion {
            reason: other.to_string(),
        },
    })
}

fn rasterize_range(
    pdf: &PdfHandle,
    first_page: u32,
    last_page: u32,
    dpi: f32,
) -> Result<Vec<DynamicImage>> {
    let pdfium = create_pdfium()?;

    let document = match pdf {
        PdfHandle::Path(path) => pdfium.load_pdf_from_file(path, None),
        PdfHandle::Bytes(data) => pdfium.load_pdf_from_byte_slice(data, None),
    }
    .map_err(|e| Error::Pdfium {
        reason: format!("{}", e),
    })?;

    let pages = document.pages();
    let page_count = pages.len() as u32;

    let config = PdfRenderConfig::new()
        .scale_page_by_factor(dpi / 72.0)
        .render_form_data(true)
        .render_annotations(true);

    let mut rendered = Vec::new();
    for page_num in first_page.max(1)..=last_page.min(page_count) {
        let page = pages
            .get((page_num - 1) as u16)
            .map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", page_num, e),
            })?;

        let bitmap = page.render_with_config(&config).map_err(|e| Error::Pdfium {
            reason: format!("Failed to render page {}: {}", page_num, e),
        })?;

        let image = bitmap.as_image();
        tracing::debug!(
            page = page_num,
            width = image.width(),
            height = image.height(),
            "Rasterized page"
        );
        rendered.push(image);
    }

    Ok(rendered)
}
