//! File Upload Storage
//!
//! Validated disk storage for multipart uploads. Each upload kind writes to
//! its own subdirectory; extension and declared MIME type are checked against
//! a fixed allow-list and a 10 MB cap is enforced before anything touches
//! disk. Files are written before the owning database row is persisted, so a
//! row never references a file that failed to write.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// Maximum accepted upload size (10 MB)
pub const MAX_UPLOAD_BYTES: usize = 10_000_000;

/// Accepted file extensions (images and documents only)
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "pdf", "doc", "docx"];

/// Accepted MIME types, mirroring [`ALLOWED_EXTENSIONS`]
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Upload capability, one per accepting form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// `bookImages` field on book create/update
    BookImage,
    /// `pyqFile` field on PYQ create/update
    PyqFile,
    /// `blogImage` field on blog create/update
    BlogImage,
}

impl UploadKind {
    /// Subdirectory under the upload root
    pub const fn subdir(&self) -> &'static str {
        match self {
            UploadKind::BookImage => "books",
            UploadKind::PyqFile => "pyqs",
            UploadKind::BlogImage => "profiles",
        }
    }

    /// The multipart field name this kind accepts
    pub const fn field_name(&self) -> &'static str {
        match self {
            UploadKind::BookImage => "bookImages",
            UploadKind::PyqFile => "pyqFile",
            UploadKind::BlogImage => "blogImage",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "bookImages" => Some(UploadKind::BookImage),
            "pyqFile" => Some(UploadKind::PyqFile),
            "blogImage" => Some(UploadKind::BlogImage),
            _ => None,
        }
    }
}

/// Upload validation/storage errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File type not allowed: images and documents only")]
    DisallowedType,

    #[error("File exceeds the {MAX_UPLOAD_BYTES} byte limit")]
    TooLarge,

    #[error("File name is missing or empty")]
    MissingName,

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed upload store
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at the given directory (usually `uploads/`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist one upload.
    ///
    /// Returns the relative path (`<root>/<subdir>/<name>`) to store on the
    /// owning record.
    pub async fn store(
        &self,
        kind: UploadKind,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if original_name.trim().is_empty() {
            return Err(UploadError::MissingName);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }

        let ext = extension_of(original_name).ok_or(UploadError::DisallowedType)?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::DisallowedType);
        }
        if let Some(mime) = content_type {
            if !ALLOWED_MIME_TYPES.contains(&mime) {
                return Err(UploadError::DisallowedType);
            }
        }

        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        // Timestamp plus a random suffix so several files from one multipart
        // body cannot collide.
        let suffix: u32 = u32::from_le_bytes(
            crate::token::random_bytes(4)
                .try_into()
                .expect("4 random bytes"),
        );
        let file_name = format!(
            "{}-{}-{:08x}.{}",
            kind.field_name(),
            Utc::now().timestamp_millis(),
            suffix,
            ext
        );

        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(format!(
            "{}/{}/{}",
            self.root.display(),
            kind.subdir(),
            file_name
        ))
    }
}

/// Lowercased extension without the dot
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Content type for serving a stored file back, derived from its extension
pub fn content_type_for(path: &str) -> &'static str {
    match extension_of(path).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_reject() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let path = store
            .store(
                UploadKind::PyqFile,
                "midterm.pdf",
                Some("application/pdf"),
                b"%PDF-1.4",
            )
            .await
            .unwrap();
        assert!(path.contains("/pyqs/"));
        assert!(path.ends_with(".pdf"));

        // Disallowed extension
        let err = store
            .store(UploadKind::PyqFile, "virus.exe", None, b"MZ")
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::DisallowedType));

        // Disallowed MIME even with an allowed extension
        let err = store
            .store(
                UploadKind::BookImage,
                "cover.jpg",
                Some("text/html"),
                b"<html>",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::DisallowedType));
    }

    #[tokio::test]
    async fn test_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = store
            .store(UploadKind::BookImage, "cover.png", None, &big)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge));
    }

    #[test]
    fn test_upload_kind_fields() {
        assert_eq!(
            UploadKind::from_field_name("bookImages"),
            Some(UploadKind::BookImage)
        );
        assert_eq!(
            UploadKind::from_field_name("pyqFile"),
            Some(UploadKind::PyqFile)
        );
        assert_eq!(
            UploadKind::from_field_name("blogImage"),
            Some(UploadKind::BlogImage)
        );
        assert_eq!(UploadKind::from_field_name("avatar"), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("uploads/books/a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("uploads/pyqs/a.pdf"), "application/pdf");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
