//! Visual Inspection MCP Server Library
//!
//! This crate provides an MCP tool that renders local files to images:
//! - `get_local_file_visual`: render an image, or one page of a PDF or HTML file
//!
//! HTML is typeset to PDF first, so every document-like format shares the
//! same pagination path in [`render::render_document_page`].

pub mod bitmap;
pub mod error;
pub mod html;
pub mod pdf;
pub mod render;
pub mod server;
pub mod source;

pub use error::{Error, Result};
pub use html::{convert_html_to_pdf, HtmlTypesetter, WeasyPrint};
pub use pdf::PdfHandle;
pub use render::{
    page_footer, render_document_page, render_image, PageRequest, RenderInput, RenderedArtifact,
    VisualItem,
};
pub use server::{
    run_server, run_server_with_config, GetLocalFileVisualParams, ServerConfig, VisualServer,
};
