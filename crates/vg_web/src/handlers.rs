use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use vg_core::PipelineItem;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImagesRequest {
    pub url: String,
}

pub async fn generate_images(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateImagesRequest>,
) -> Result<Json<Vec<PipelineItem>>, ApiError> {
    let items = state.pipeline.run(&request.url).await?;
    Ok(Json(items))
}
