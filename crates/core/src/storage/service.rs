//! Storage service implementation using Apache OpenDAL.

use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use opendal::{ErrorKind, Operator, services};
use serde::Serialize;
use tracing::debug;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Directory used for uploads that name no entry.
pub const DEFAULT_UPLOAD_DIR: &str = "general";

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Entry the file belongs to, if any.
    pub uid: Option<String>,
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Filename as the client sent it.
    pub original_name: String,
    /// Name the file was stored under.
    pub file_name: String,
    /// Storage key.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Content type.
    pub mime_type: String,
    /// Upload directory the file landed in.
    pub uid: String,
}

/// Storage service for entry uploads.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Validate an upload against size and MIME constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Directory holding an entry's uploads, if `uid` can name one.
    ///
    /// Only ids made of ASCII alphanumerics, `.`, `-` and `_` qualify, and
    /// never an all-dots id or the shared [`DEFAULT_UPLOAD_DIR`]. Ids are
    /// used verbatim so two entries never share a directory.
    #[must_use]
    pub fn entry_dir(uid: &str) -> Option<&str> {
        let usable = !uid.is_empty()
            && uid != DEFAULT_UPLOAD_DIR
            && !uid.chars().all(|c| c == '.')
            && uid.chars().all(is_safe_char);
        usable.then_some(uid)
    }

    /// Directory an upload lands in.
    ///
    /// No id (or an empty one, or `general` itself) means [`DEFAULT_UPLOAD_DIR`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidUploadDir` for an id [`Self::entry_dir`] refuses.
    pub fn upload_dir(uid: Option<&str>) -> Result<&str, StorageError> {
        match uid {
            None | Some("" | DEFAULT_UPLOAD_DIR) => Ok(DEFAULT_UPLOAD_DIR),
            Some(uid) => Self::entry_dir(uid).ok_or_else(|| StorageError::invalid_upload_dir(uid)),
        }
    }

    /// Storage key for an upload: `{dir}/{unix_millis}{.ext}`.
    #[must_use]
    pub fn upload_key(dir: &str, filename: &str, unix_millis: i64) -> String {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(sanitize_segment)
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        format!("{dir}/{unix_millis}{ext}")
    }

    /// Validates and writes an upload.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is rejected or the write fails.
    pub async fn store_upload(&self, req: UploadRequest) -> Result<StoredFile, StorageError> {
        let size = req.data.len() as u64;
        self.validate_upload(&req.content_type, size)?;

        let uid = Self::upload_dir(req.uid.as_deref())?.to_string();
        let key = Self::upload_key(&uid, &req.filename, Utc::now().timestamp_millis());

        self.operator.write(&key, req.data).await?;

        let file_name = key
            .rsplit_once('/')
            .map_or_else(|| key.clone(), |(_, name)| name.to_string());

        Ok(StoredFile {
            original_name: req.filename,
            file_name,
            path: key,
            size,
            mime_type: req.content_type,
            uid,
        })
    }

    /// Removes an entry's upload directory and everything in it.
    ///
    /// Returns the number of files deleted. A missing directory, or an id
    /// that cannot name one (see [`Self::entry_dir`]), counts as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if listing or deletion fails.
    pub async fn remove_dir(&self, uid: &str) -> Result<usize, StorageError> {
        let Some(dir) = Self::entry_dir(uid) else {
            debug!(uid = %uid, "No upload directory for this id");
            return Ok(0);
        };
        let dir = format!("{dir}/");

        let mut entries = match self.operator.list_with(&dir).recursive(true).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        // Children before parents so directories are empty when removed.
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.path().len()));

        let mut removed = 0;
        for entry in &entries {
            let path = entry.path();
            if path == dir {
                continue;
            }
            self.operator.delete(path).await?;
            if !path.ends_with('/') {
                removed += 1;
            }
        }
        self.operator.delete(&dir).await?;

        Ok(removed)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

const fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

/// Sanitize a single path segment.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores;
/// everything else (separators included) becomes `_`.
pub(crate) fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect()
}
