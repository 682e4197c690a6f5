//! Save question images to a local gallery directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait GalleryWriter: Send + Sync {
    /// Download `url` and store it as `filename`. Failures are logged and
    /// reported as `false`.
    async fn save_image(&self, url: &str, filename: &str) -> bool;
}

/// Downloads over HTTP(S) and writes into `dir`.
pub struct HttpGalleryWriter {
    client: reqwest::Client,
    dir: PathBuf,
}

impl HttpGalleryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        Self::with_timeout(dir, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::Other("HTTP_CLIENT".into()),
                    format!("http client setup failed: {e}"),
                )
            })?;
        Ok(Self {
            client,
            dir: dir.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(map_http_err)?;
        let body = response.bytes().await.map_err(map_http_err)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl GalleryWriter for HttpGalleryWriter {
    async fn save_image(&self, url: &str, filename: &str) -> bool {
        let result = match validate_filename(filename) {
            Ok(()) => match self.download(url).await {
                Ok(body) => persist(&self.dir, filename, &body).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        match result {
            Ok(path) => {
                info!(url, path = %path.display(), "Image saved to gallery");
                true
            }
            Err(e) => {
                warn!(url, filename, error = %e, "Image save failed");
                false
            }
        }
    }
}

fn map_http_err(e: reqwest::Error) -> DomainError {
    let kind = if e.is_timeout() {
        InfraErrorKind::Timeout
    } else if e.is_connect() {
        InfraErrorKind::Unavailable
    } else {
        InfraErrorKind::Other("HTTP".into())
    };
    DomainError::infra(kind, format!("image download failed: {e}"))
}

/// A bare file name: no separators, no parent references.
fn validate_filename(filename: &str) -> Result<(), DomainError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if bad {
        return Err(DomainError::validation(
            ValidationKind::Other("INVALID_FILENAME".into()),
            format!("'{filename}' is not a plain file name"),
        ));
    }
    Ok(())
}

/// Write via a temp file and rename, so readers never see partial images.
pub(crate) async fn persist(dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf, DomainError> {
    validate_filename(filename)?;
    tokio::fs::create_dir_all(dir).await.map_err(map_io_err)?;

    let target = dir.join(filename);
    let staging = dir.join(format!(".{filename}.partial"));
    tokio::fs::write(&staging, data).await.map_err(map_io_err)?;
    if let Err(e) = tokio::fs::rename(&staging, &target).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(map_io_err(e));
    }
    Ok(target)
}

fn map_io_err(e: std::io::Error) -> DomainError {
    DomainError::infra(
        InfraErrorKind::Other("FILESYSTEM".into()),
        format!("gallery write failed: {e}"),
    )
}
