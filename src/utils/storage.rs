//! Local filesystem storage for uploaded book cover images.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::storage::StorageConfig;
use crate::utils::errors::AppError;

/// Filesystem-backed storage for uploaded images.
///
/// Files are written under the configured upload directory and served
/// statically at `<public_url>/uploads/<key>`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base_dir: PathBuf,
    public_url: String,
}

impl FileStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            base_dir: config.upload_dir,
            public_url: config.public_url,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Builds a storage key from an uploaded file's original name: a
    /// millisecond timestamp prefix plus the sanitized name.
    pub fn make_key(original_name: &str) -> String {
        let mut sanitized = String::with_capacity(original_name.len());
        let mut prev_dot = false;
        for c in original_name.chars() {
            let c = if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            };
            // Collapse dot runs so a key never contains "..".
            if c == '.' && prev_dot {
                continue;
            }
            prev_dot = c == '.';
            sanitized.push(c);
        }

        format!("{}-{}", chrono::Utc::now().timestamp_millis(), sanitized)
    }

    /// Writes `content` under `key` and returns the key.
    pub async fn save(&self, key: &str, content: &[u8]) -> Result<String, AppError> {
        Self::validate_key(key)?;

        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.base_dir.join(key), content).await?;

        Ok(key.to_string())
    }

    /// Removes a stored file. A missing file is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        Self::validate_key(key)?;

        match fs::remove_file(self.base_dir.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(e)),
        }
    }

    /// Public URL a stored key is served at.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/uploads/{}", self.public_url, key)
    }

    /// Extracts the storage key from a URL produced by [`FileStorage::url_for`].
    /// Returns `None` for URLs that do not point at the upload path.
    pub fn key_from_url(url: &str) -> Option<&str> {
        url.rsplit_once("/uploads/").map(|(_, key)| key)
    }

    // Keys are single path segments; separators and traversal are rejected.
    fn validate_key(key: &str) -> Result<(), AppError> {
        if key.is_empty() || key.contains("..") || key.contains('/') || key.contains('\\') {
            return Err(AppError::bad_request(anyhow::anyhow!("Invalid storage key")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key_keeps_safe_characters() {
        let key = FileStorage::make_key("cover-image_1.png");
        assert!(key.ends_with("-cover-image_1.png"));
    }

    #[test]
    fn test_make_key_replaces_unsafe_characters() {
        let key = FileStorage::make_key("my book cover!.png");
        assert!(key.ends_with("-my_book_cover_.png"));
        assert!(!key.contains(' '));
    }

    #[test]
    fn test_make_key_collapses_dot_runs() {
        let key = FileStorage::make_key("cover..png");
        assert!(!key.contains(".."));
        assert!(key.ends_with("-cover.png"));
    }

    #[test]
    fn test_make_key_rejects_path_separators() {
        let key = FileStorage::make_key("../../etc/passwd");
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_key_from_url_extracts_key() {
        let url = "http://localhost:3000/uploads/1700000000000-cover.png";
        assert_eq!(
            FileStorage::key_from_url(url),
            Some("1700000000000-cover.png")
        );
    }

    #[test]
    fn test_key_from_url_rejects_foreign_urls() {
        assert_eq!(FileStorage::key_from_url("https://example.com/cover.png"), None);
    }
}
