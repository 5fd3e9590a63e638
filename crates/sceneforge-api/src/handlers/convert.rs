//! Conversion upload handler.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::info;

use sceneforge_core::error::AppError;
use sceneforge_core::formats::GLB_MIME;
use sceneforge_engine::ConversionRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /convert — multipart upload, returns the converted scene as a
/// binary attachment.
pub async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut job_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;
                upload = Some((file_name, data));
            }
            Some("jobId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read jobId: {e}")))?;
                if !value.is_empty() {
                    job_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::validation("No file provided"))?;

    info!(
        file = %file_name,
        bytes = data.len(),
        job_id = job_id.as_deref(),
        "Conversion requested"
    );

    let scene = state
        .pipeline
        .convert(ConversionRequest {
            job_id,
            file_name,
            data,
        })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", scene.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, GLB_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        scene.data,
    )
        .into_response())
}
