//! Terminal renderers
//!
//! [`render_image`] and [`render_document_page`] never fail: every internal
//! error is logged and converted into a single text item whose message starts
//! with `"Error"`. The fallible stages underneath return [`crate::Result`].

use crate::bitmap;
use crate::error::{Error, Result};
use crate::pdf::{self, PdfHandle};
use base64::Engine;
use image::DynamicImage;
use std::path::PathBuf;

/// Default rasterization resolution for document pages
pub const DEFAULT_RENDER_DPI: f32 = 200.0;

/// Encoded image returned to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Encoded image bytes
    pub data: Vec<u8>,
    /// Lowercase encoding name, e.g. `"png"` or `"jpeg"`
    pub format: String,
}

impl RenderedArtifact {
    /// MIME type for the encoded bytes
    pub fn mime_type(&self) -> String {
        format!("image/{}", self.format)
    }

    /// Base64 encoding of the bytes, as MCP image content expects
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// One element of a tool result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualItem {
    Image(RenderedArtifact),
    Text(String),
}

impl VisualItem {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VisualItem::Text(text) => Some(text),
            VisualItem::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&RenderedArtifact> {
        match self {
            VisualItem::Image(artifact) => Some(artifact),
            VisualItem::Text(_) => None,
        }
    }
}

/// Convert an error into the single-item text result used by terminal calls.
pub(crate) fn error_result(error: &Error, context: &str) -> Vec<VisualItem> {
    if error.is_input_error() {
        tracing::warn!(error = %error, "Visual request rejected");
    } else {
        tracing::error!(error = %error, context, "Visual rendering failed");
    }
    vec![VisualItem::Text(error.user_message(context))]
}

/// Image content to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInput {
    /// Raw bytes; the MIME type decides the output encoding
    Bytes { data: Vec<u8>, mime_type: String },
    /// File on disk; the format is detected from content and output is always PNG
    Path(PathBuf),
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u32,
    /// Bound on the larger side of the output, `None` for no resizing
    pub max_dimension: Option<u32>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            max_dimension: None,
        }
    }
}

impl PageRequest {
    /// Validate raw tool parameters. Non-positive values are rejected.
    pub fn new(page_number: i64, max_dimension: Option<i64>) -> Result<Self> {
        let page_number = u32::try_from(page_number)
            .ok()
            .filter(|&p| p >= 1)
            .ok_or(Error::InvalidPageNumber { page: page_number })?;

        Ok(Self {
            page_number,
            max_dimension: validate_max_dimension(max_dimension)?,
        })
    }
}

/// Validate an optional `max_dimension` parameter.
pub fn validate_max_dimension(max_dimension: Option<i64>) -> Result<Option<u32>> {
    match max_dimension {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .ok()
            .filter(|&v| v >= 1)
            .map(Some)
            .ok_or(Error::InvalidMaxDimension { value }),
    }
}

/// Decode, resize and re-encode an image.
///
/// Returns one image item, or one text item on any failure.
pub fn render_image(input: &RenderInput, max_dimension: Option<u32>) -> Vec<VisualItem> {
    match try_render_image(input, max_dimension) {
        Ok(artifact) => vec![VisualItem::Image(artifact)],
        Err(e) => error_result(&e, "rendering image"),
    }
}

fn try_render_image(input: &RenderInput, max_dimension: Option<u32>) -> Result<RenderedArtifact> {
    let (image, (format, codec)) = match input {
        RenderInput::Path(path) => (bitmap::decode_path(path)?, bitmap::output_format("png")?),
        RenderInput::Bytes { data, mime_type } => (
            bitmap::decode_bytes(data)?,
            bitmap::output_format_for_mime(mime_type)?,
        ),
    };

    let image = bitmap::resize_to_fit(image, max_dimension);
    let data = bitmap::encode(&image, codec)?;

    Ok(RenderedArtifact { data, format })
}

/// Status footer for a successfully rendered page.
pub fn page_footer(page_number: u32, total_pages: u32) -> String {
    let mut footer = format!("Displaying Page {} of {}.", page_number, total_pages);
    if page_number < total_pages {
        footer.push_str(&format!(
            " Call this tool again with page_number={} to see the next page.",
            page_number + 1
        ));
    }
    footer
}

/// A rasterized page with its navigation footer
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub artifact: RenderedArtifact,
    pub footer: String,
}

impl From<RenderedPage> for Vec<VisualItem> {
    fn from(page: RenderedPage) -> Self {
        vec![VisualItem::Image(page.artifact), VisualItem::Text(page.footer)]
    }
}

/// Render one page of a PDF as PNG.
///
/// Returns `[image, footer]` on success, or one text item on any failure.
pub fn render_document_page(pdf: &PdfHandle, request: PageRequest, dpi: f32) -> Vec<VisualItem> {
    match try_render_document_page(pdf, request, dpi) {
        Ok(page) => page.into(),
        Err(e) => error_result(&e, "rendering document"),
    }
}

/// Resolve the page count, rasterize exactly the requested page, post-process.
pub fn try_render_document_page(
    pdf: &PdfHandle,
    request: PageRequest,
    dpi: f32,
) -> Result<RenderedPage> {
    let page_number = request.page_number;
    let total_pages = pdf::page_count(pdf)?;

    if page_number > total_pages {
        return Err(Error::PageOutOfRange {
            page: page_number,
            total: total_pages,
        });
    }

    let images = pdf::rasterize(pdf, page_number, page_number, dpi)?;
    let page = finish_page(images, request, total_pages)?;

    tracing::debug!(
        source = %pdf.describe(),
        page = page_number,
        total = total_pages,
        bytes = page.artifact.data.len(),
        "Rendered document page"
    );

    Ok(page)
}

/// Resize and encode the rasterized page, then attach its footer.
///
/// An empty rasterization is reported as [`Error::EmptyRender`].
fn finish_page(
    images: Vec<DynamicImage>,
    request: PageRequest,
    total_pages: u32,
) -> Result<RenderedPage> {
    let page_number = request.page_number;
    let image = images
        .into_iter()
        .next()
        .ok_or(Error::EmptyRender { page: page_number })?;

    let image = bitmap::resize_to_fit(image, request.max_dimension);
    let data = bitmap::encode_png(&image)?;

    Ok(RenderedPage {
        artifact: RenderedArtifact {
            data,
            format: "png".to_string(),
        },
        footer: page_footer(page_number, total_pages),
    })
}
