//! Resolve a local path into a renderable file kind

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Fallback when the MIME type cannot be inferred from the name
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Coarse renderer family for a MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Html,
    Unsupported(String),
}

/// A validated local file ready for dispatch
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    pub mime_type: String,
    pub kind: FileKind,
}

/// Infer a MIME type from the path's extension.
pub fn guess_mime_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Map a MIME type to the renderer that handles it.
pub fn classify_mime(mime_type: &str) -> FileKind {
    if mime_type.starts_with("image/") {
        FileKind::Image
    } else if mime_type == "application/pdf" {
        FileKind::Pdf
    } else if mime_type == "text/html" {
        FileKind::Html
    } else {
        FileKind::Unsupported(mime_type.to_string())
    }
}

/// Validate that a path is within allowed resource directories.
/// If no resource_dirs are configured, all paths are allowed.
///
/// Returns the canonical path. A missing file is canonicalized through its
/// parent directory, so paths outside the sandbox are denied whether or not
/// they exist.
fn validate_path_access(path: &Path, resource_dirs: &[String]) -> Result<PathBuf> {
    if resource_dirs.is_empty() {
        return Ok(path.to_path_buf());
    }

    let denied = || Error::PathAccessDenied {
        path: path.display().to_string(),
    };

    let canonical = match std::fs::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => {
            let parent = path.parent().unwrap_or(Path::new("."));
            let file_name = path.file_name().ok_or_else(denied)?;
            std::fs::canonicalize(parent)
                .map_err(|_| denied())?
                .join(file_name)
        }
    };

    let allowed = resource_dirs.iter().any(|dir| {
        std::fs::canonicalize(dir)
            .map(|canonical_dir| canonical.starts_with(canonical_dir))
            .unwrap_or(false)
    });

    if allowed {
        Ok(canonical)
    } else {
        Err(denied())
    }
}

/// Check that `path` is an existing regular file and classify it.
///
/// Unsupported MIME types are not an error here; the caller decides.
pub fn resolve_local_file<P: AsRef<Path>>(path: P, resource_dirs: &[String]) -> Result<LocalFile> {
    let path = validate_path_access(path.as_ref(), resource_dirs)?;

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    if !path.is_file() {
        return Err(Error::NotAFile {
            path: path.display().to_string(),
        });
    }

    let mime_type = guess_mime_type(&path);
    let kind = classify_mime(&mime_type);

    Ok(LocalFile {
        path,
        mime_type,
        kind,
    })
}
