//! MCP Server implementation using rmcp

use crate::error::Error;
use crate::html::{convert_html_to_pdf, HtmlTypesetter, WeasyPrint};
use crate::pdf::{self, PdfHandle};
use crate::render::{
    error_result, render_document_page, render_image, validate_max_dimension, PageRequest,
    RenderInput, VisualItem, DEFAULT_RENDER_DPI,
};
use crate::source::{resolve_local_file, FileKind};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Resource and rendering configuration for the visual inspection server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directories local files must live in; empty allows any path
    pub resource_dirs: Vec<String>,
    /// Rasterization resolution for PDF and HTML pages (default: 200)
    pub render_dpi: f32,
    /// HTML typesetter executable (default: "weasyprint")
    pub typesetter_binary: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            resource_dirs: Vec::new(),
            render_dpi: DEFAULT_RENDER_DPI,
            typesetter_binary: "weasyprint".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from `VISUAL_INSPECT_*` environment variables.
    ///
    /// - `VISUAL_INSPECT_RESOURCE_DIRS`: allowed directories, separated like `PATH`
    /// - `VISUAL_INSPECT_RENDER_DPI`: positive number
    /// - `VISUAL_INSPECT_TYPESETTER`: typesetter executable
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dirs) = var("VISUAL_INSPECT_RESOURCE_DIRS") {
            config.resource_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().to_string())
                .collect();
        }

        if let Some(dpi) = var("VISUAL_INSPECT_RENDER_DPI") {
            match dpi.trim().parse::<f32>() {
                Ok(v) if v.is_finite() && v > 0.0 => config.render_dpi = v,
                _ => tracing::warn!(value = %dpi, "Ignoring invalid VISUAL_INSPECT_RENDER_DPI"),
            }
        }

        if let Some(binary) = var("VISUAL_INSPECT_TYPESETTER") {
            if !binary.trim().is_empty() {
                config.typesetter_binary = binary.trim().to_string();
            }
        }

        config
    }
}

/// Visual inspection MCP Server
#[derive(Clone)]
pub struct VisualServer {
    tool_router: ToolRouter<Self>,
    config: Arc<ServerConfig>,
    typesetter: Arc<dyn HtmlTypesetter>,
}

// ============================================================================
// Request types for get_local_file_visual
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetLocalFileVisualParams {
    /// Absolute path to the local file
    pub path: String,
    /// Page number to render (default: 1). Ignored for images.
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    /// Optional maximum width or height of the returned image
    #[serde(default)]
    pub max_dimension: Option<i64>,
}

fn default_page_number() -> i64 {
    1
}

impl From<VisualItem> for Content {
    fn from(item: VisualItem) -> Self {
        match item {
            VisualItem::Image(artifact) => {
                Content::image(artifact.to_base64(), artifact.mime_type())
            }
            VisualItem::Text(text) => Content::text(text),
        }
    }
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl VisualServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new VisualServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let typesetter = Arc::new(WeasyPrint::new(config.typesetter_binary.clone()));
        Self::with_typesetter(config, typesetter)
    }

    /// Create a new VisualServer with a custom HTML typesetter
    pub fn with_typesetter(config: ServerConfig, typesetter: Arc<dyn HtmlTypesetter>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            typesetter,
        }
    }

    /// Render a local file for visual inspection
    #[tool(
        description = "Visually inspect a local file by rendering it. Supports PDF, Images (PNG/JPG), and HTML files.

- path: Absolute path to the local file.
- page_number: Page number to render (default 1). Ignored for images.
- max_dimension: Optional maximum width or height of the returned image.

PDF and HTML files are rendered one page at a time; the returned text reports the current page and how to request the next one."
    )]
    async fn get_local_file_visual(
        &self,
        Parameters(params): Parameters<GetLocalFileVisualParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let items = self.process_local_file_visual(&params).await;
        Ok(CallToolResult::success(
            items.into_iter().map(Content::from).collect(),
        ))
    }
}

impl VisualServer {
    /// Dispatch a local file to the renderer for its kind.
    ///
    /// Always returns at least one item; failures are a single `Error...` text.
    pub async fn process_local_file_visual(
        &self,
        params: &GetLocalFileVisualParams,
    ) -> Vec<VisualItem> {
        let file = match resolve_local_file(&params.path, &self.config.resource_dirs) {
            Ok(file) => file,
            Err(e) => return error_result(&e, "reading file"),
        };

        tracing::debug!(path = %file.path.display(), mime_type = %file.mime_type, "Dispatching local file");

        match file.kind {
            FileKind::Image => {
                let max_dimension = match validate_max_dimension(params.max_dimension) {
                    Ok(v) => v,
                    Err(e) => return error_result(&e, "rendering image"),
                };
                let input = RenderInput::Path(file.path);
                run_blocking(move || render_image(&input, max_dimension)).await
            }
            FileKind::Pdf => {
                let request = match PageRequest::new(params.page_number, params.max_dimension) {
                    Ok(r) => r,
                    Err(e) => return error_result(&e, "rendering document"),
                };
                let pdf = PdfHandle::from(file.path);
                let dpi = self.config.render_dpi;
                run_blocking(move || render_document_page(&pdf, request, dpi)).await
            }
            FileKind::Html => self
                .process_html_file(file.path, params)
                .await
                .unwrap_or_else(|e| error_result(&e, "rendering HTML file")),
            FileKind::Unsupported(mime_type) => {
                error_result(&Error::UnsupportedMimeType { mime_type }, "reading file")
            }
        }
    }

    /// Read an HTML file, lower it to PDF, then paginate the PDF bytes.
    async fn process_html_file(
        &self,
        path: PathBuf,
        params: &GetLocalFileVisualParams,
    ) -> crate::error::Result<Vec<VisualItem>> {
        let request = PageRequest::new(params.page_number, params.max_dimension)?;
        let html = tokio::fs::read_to_string(&path).await?;
        let pdf = convert_html_to_pdf(self.typesetter.clone(), html).await?;

        let dpi = self.config.render_dpi;
        Ok(run_blocking(move || render_document_page(&pdf, request, dpi)).await)
    }
}

/// Run a terminal renderer on the blocking pool.
async fn run_blocking<F>(render: F) -> Vec<VisualItem>
where
    F: FnOnce() -> Vec<VisualItem> + Send + 'static,
{
    tokio::task::spawn_blocking(render).await.unwrap_or_else(|e| {
        error_result(
            &Error::TaskJoin {
                reason: e.to_string(),
            },
            "reading file",
        )
    })
}

impl Default for VisualServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for VisualServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Visual inspection server: renders local PDF, image, and HTML files to images. \
                 Multi-page documents are returned one page per call."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with default configuration
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = VisualServer::with_config(config);

    let typesetter = server.typesetter.clone();
    let (pdfium_ok, typesetter_ok) =
        tokio::task::spawn_blocking(move || (pdf::pdfium_available(), typesetter.is_available()))
            .await?;
    if !pdfium_ok {
        tracing::warn!("PDFium library not found; PDF and HTML rendering will fail");
    }
    if !typesetter_ok {
        tracing::warn!(
            typesetter = server.typesetter.name(),
            "HTML typesetter not found; HTML rendering will fail"
        );
    }

    tracing::info!("Visual inspection server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
