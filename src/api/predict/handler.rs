// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartError};
use tracing::{debug, warn};

use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{decode_image_bytes, preprocess_for_classifier};

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// POST /predict - Classify an uploaded chest X-ray
///
/// # Request
/// `multipart/form-data` with the image in the `file` field. If no field is
/// named `file`, the first field with a filename is used.
///
/// # Response
/// - `predicted_class`: "Normal" or "Pneumonia"
/// - `confidence`: Confidence in that class, percent rounded to 2 decimals
///
/// # Errors
/// - 400 Bad Request: Missing upload, malformed multipart, bytes are not an image
/// - 413 Payload Too Large: Upload exceeds 10MB
/// - 500 Internal Server Error: Model inference failed
pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let bytes = read_upload(&mut multipart).await?;
    debug!("Prediction request received: {} bytes", bytes.len());

    let classifier = state.classifier.clone();

    // Decoding, resizing and the forward pass are CPU-bound
    let prediction = tokio::task::spawn_blocking(move || {
        let (image, info) = decode_image_bytes(&bytes)?;
        debug!(
            "Decoded image: {}x{} {:?}, {} bytes",
            info.width,
            info.height,
            info.format,
            info.size_bytes
        );

        let tensor = preprocess_for_classifier(&image);
        classifier.classify(&tensor).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("prediction task failed: {}", e)))?
    .map_err(|e| {
        warn!("Prediction failed: {}", e);
        e
    })?;

    Ok(Json(PredictResponse::from(prediction)))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    let mut fallback: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            return field.bytes().await.map_err(multipart_error);
        }

        if fallback.is_none() && field.file_name().is_some() {
            fallback = Some(field.bytes().await.map_err(multipart_error)?);
        }
    }

    fallback.ok_or_else(|| {
        ApiError::InvalidRequest(format!("multipart field '{}' is required", UPLOAD_FIELD))
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::InvalidRequest(err.body_text())
    }
}
