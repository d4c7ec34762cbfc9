use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use log::warn;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Unsupported attachment type: {0}")]
    UnsupportedMediaType(String),
    #[error("Attachment file IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file on disk backing the attachment preview shown while the message
/// is still being composed. The file lives in the system temp directory
/// and is deleted when the handle is released, or at drop as a backstop.
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
    released: bool,
}

impl PreviewHandle {
    fn write(bytes: &[u8]) -> Result<Self, std::io::Error> {
        let path = std::env::temp_dir().join(format!("attachment-preview-{}", Uuid::new_v4()));
        std::fs::write(&path, bytes)?;
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the backing file. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(
                "Failed to remove preview file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// An image the user has picked but not yet sent. Only one can be staged
/// at a time; staging another replaces it.
#[derive(Debug)]
pub struct PendingAttachment {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl PendingAttachment {
    /// Stages raw bytes as an attachment. Anything that is not an image
    /// media type is rejected before a preview file gets written.
    pub fn new(file_name: &str, media_type: &str, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        if !media_type.starts_with("image/") {
            return Err(AttachmentError::UnsupportedMediaType(media_type.to_string()));
        }
        let preview = PreviewHandle::write(&bytes)?;
        Ok(Self {
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            bytes,
            preview,
        })
    }

    /// Stages a file from disk, inferring the media type from its extension.
    pub fn from_file(path: &Path) -> Result<Self, AttachmentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let media_type = media_type_for_extension(extension)
            .ok_or_else(|| AttachmentError::UnsupportedMediaType(extension.to_string()))?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        let bytes = std::fs::read(path)?;

        let preview = PreviewHandle::write(&bytes)?;
        Ok(Self {
            file_name,
            media_type: media_type.to_string(),
            bytes,
            preview,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn preview_path(&self) -> &Path {
        self.preview.path()
    }

    /// Inline form sent over the wire, `data:<media type>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        let b64 = general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.media_type, b64)
    }

    pub(crate) fn release_preview(&mut self) {
        self.preview.release();
    }
}

fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
