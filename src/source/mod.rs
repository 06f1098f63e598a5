//! Local file resolution and format classification

pub mod resolver;

pub use resolver::{classify_mime, guess_mime_type, resolve_local_file, FileKind, LocalFile};
