//! Image upload
//!
//! Accepts a single multipart `file` field, checks its MIME type and size,
//! and stores it as `<unix-millis>.<ext>` under the upload directory.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::error::ApiError;
use crate::http::extractors::CurrentAdmin;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Largest accepted image
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route, above [`MAX_UPLOAD_BYTES`] so
/// oversize files reach the size check instead of failing mid-stream.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Accepted MIME types and the extension stored for each
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/webp", "webp"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

const MAX_NAME_ATTEMPTS: i64 = 16;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

/// Stored extension for an allowed MIME type.
pub fn extension_for(content_type: Option<&str>) -> Result<&'static str, ValidationError> {
    let content_type = content_type.unwrap_or_default();
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
        .ok_or_else(|| ValidationError::InvalidVariant {
            field: "file type",
            value: content_type.to_owned(),
        })
}

fn multipart_error(detail: String) -> ApiError {
    ApiError::Validation(ValidationError::InvalidBody(detail))
}

/// POST /api/upload
async fn upload(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| multipart_error(e.body_text()))?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e.body_text()))?;
        file = Some((content_type, data));
        break;
    }

    let (content_type, data) = file.ok_or(ValidationError::Required { field: "file" })?;
    let extension = extension_for(content_type.as_deref())?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            field: "file",
            max_bytes: MAX_UPLOAD_BYTES,
        }
        .into());
    }

    let name = store(&state.upload_dir, extension, &data).await?;
    tracing::info!(admin = %admin.username, file = %name, bytes = data.len(), "image uploaded");

    Ok(Json(UploadResponse {
        image_url: format!("/uploads/{}", name),
    }))
}

/// Write `data` to a new `<millis>.<ext>` file, never overwriting.
async fn store(dir: &Path, extension: &str, data: &[u8]) -> std::io::Result<String> {
    fs::create_dir_all(dir).await?;

    let millis = Utc::now().timestamp_millis();
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = format!("{}.{}", millis + attempt, extension);
        let path = dir.join(&name);

        let mut out = match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };
        write_or_remove(&mut out, &path, data).await?;
        return Ok(name);
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "no free upload file name",
    ))
}

/// Write all of `data`; on failure delete `path` so no truncated file is served.
async fn write_or_remove<W>(out: &mut W, path: &Path, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(data).await?;
        out.flush().await
    }
    .await;

    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial upload");
        }
        return Err(e);
    }
    Ok(())
}

/// Upload routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_types_map_to_extensions() {
        assert_eq!(extension_for(Some("image/png")).unwrap(), "png");
        assert_eq!(extension_for(Some("image/webp")).unwrap(), "webp");
        assert_eq!(extension_for(Some("image/jpeg")).unwrap(), "jpg");
        assert_eq!(extension_for(Some("image/jpg")).unwrap(), "jpg");
        assert_eq!(extension_for(Some("IMAGE/PNG")).unwrap(), "png");
    }

    #[test]
    fn other_types_rejected() {
        assert!(extension_for(Some("text/plain")).is_err());
        assert!(extension_for(Some("image/gif")).is_err());
        assert!(extension_for(Some("image/svg+xml")).is_err());
        assert!(extension_for(None).is_err());
    }

    #[tokio::test]
    async fn store_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = store(dir.path(), "png", b"one").await.unwrap();
        let second = store(dir.path(), "png", b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"two");
    }

    /// Writer that accepts nothing.
    struct BrokenWriter;

    impl AsyncWrite for BrokenWriter {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("disk full")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.png");
        std::fs::write(&path, b"").unwrap();

        let result = write_or_remove(&mut BrokenWriter, &path, b"image bytes").await;

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        let name = store(&nested, "webp", b"img").await.unwrap();

        assert!(name.ends_with(".webp"));
        assert!(nested.join(name).exists());
    }
}
