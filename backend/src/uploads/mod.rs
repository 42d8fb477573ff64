//! Upload storage
//!
//! Handlers read multipart bodies into [`UploadedFile`]s, hand them to an
//! [`UploadStore`] and persist the public URL of the stored file. Files
//! are served back read-only under [`UPLOADS_ROUTE`].

mod form;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{header::HOST, HeaderMap};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ServerConfig;

pub use form::MultipartForm;

/// Path prefix under which stored files are served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Errors raised while storing uploads
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received in a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// Port for persisting uploaded files
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store the file and return the filename it is reachable under
    async fn store(&self, file: &UploadedFile) -> Result<String, UploadError>;

    /// Delete a stored file; one that is already gone is not an error
    async fn remove(&self, filename: &str) -> Result<(), UploadError>;
}

/// Stores uploads as plain files in one directory
#[derive(Debug, Clone)]
pub struct DiskUploadStore {
    dir: PathBuf,
}

impl DiskUploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write_new(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(filename))
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn store(&self, file: &UploadedFile) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let safe_name = sanitize_file_name(&file.file_name);
        let mut filename = format!("{}-{}", Utc::now().timestamp_millis(), safe_name);

        if let Err(e) = self.write_new(&filename, &file.bytes).await {
            if e.kind() != ErrorKind::AlreadyExists {
                return Err(e.into());
            }
            // Same name within the same millisecond
            filename = format!(
                "{}-{}-{}",
                Utc::now().timestamp_millis(),
                Uuid::new_v4().simple(),
                safe_name
            );
            self.write_new(&filename, &file.bytes).await?;
        }

        debug!(filename = %filename, size = file.bytes.len(), "Stored upload");
        Ok(filename)
    }

    async fn remove(&self, filename: &str) -> Result<(), UploadError> {
        // Only names this store could have produced
        if filename != sanitize_file_name(filename) {
            warn!(filename = %filename, "Refusing to remove a foreign upload path");
            return Ok(());
        }

        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => {
                debug!(filename = %filename, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove a stored upload, logging instead of failing
pub async fn discard(uploads: &dyn UploadStore, filename: &str) {
    if let Err(e) = uploads.remove(filename).await {
        warn!(filename = %filename, error = %e, "Failed to remove upload");
    }
}

/// Pass `result` through, discarding the freshly stored `filename` if it
/// failed
pub async fn discard_on_err<T, E>(
    uploads: &dyn UploadStore,
    filename: Option<&str>,
    result: Result<T, E>,
) -> Result<T, E> {
    if let (Err(_), Some(filename)) = (&result, filename) {
        discard(uploads, filename).await;
    }
    result
}

/// Reduce a client-supplied name to a safe single path segment
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// The origin clients should use to reach this server
///
/// `server.public_url` wins when set; otherwise the request's `Host`
/// header is used, falling back to the bind address. The scheme is `http`
/// unless `server.trust_forwarded_headers` is on and `x-forwarded-proto`
/// names `http` or `https`.
pub fn public_origin(headers: &HeaderMap, server: &ServerConfig) -> String {
    if let Some(url) = server.public_url.as_deref() {
        return url.trim_end_matches('/').to_string();
    }

    let scheme = server
        .trust_forwarded_headers
        .then(|| forwarded_scheme(headers))
        .flatten()
        .unwrap_or("http");
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{}", server.host, server.port));

    format!("{}://{}", scheme, host)
}

fn forwarded_scheme(headers: &HeaderMap) -> Option<&'static str> {
    let proto = headers.get("x-forwarded-proto")?.to_str().ok()?;
    // A proxy chain may append one value per hop
    let first = proto.split(',').next()?.trim();
    if first.eq_ignore_ascii_case("https") {
        Some("https")
    } else if first.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

/// Public URL of a stored upload
pub fn public_url(origin: &str, filename: &str) -> String {
    format!("{}{}/{}", origin, UPLOADS_ROUTE, filename)
}

/// The stored filename a public upload URL points at
pub fn stored_filename(url: &str) -> Option<&str> {
    let marker = format!("{}/", UPLOADS_ROUTE);
    let (_, filename) = url.rsplit_once(marker.as_str())?;
    (!filename.is_empty()).then_some(filename)
}
