//! Detection endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use tracing::debug;
use vrelay_models::RequestResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Run detection on an uploaded image.
///
/// Accepts the CodeProject.AI request shape, a `multipart/form-data` body
/// with an `image` file field, and answers with the fused predictions.
pub async fn detect_objects(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<RequestResult>> {
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            image = Some(field.bytes().await?);
            break;
        }
    }

    let image = match image {
        Some(data) if !data.is_empty() => data,
        Some(_) => return Err(ApiError::bad_request("Uploaded image is empty")),
        None => return Err(ApiError::bad_request("Missing 'image' file field")),
    };

    debug!(bytes = image.len(), "Received image");

    let result = state.orchestrator.process(image).await;
    Ok(Json(result))
}
