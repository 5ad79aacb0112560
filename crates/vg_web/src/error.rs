use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vg_core::Error;
use vg_scrapers::{PipelineError, Stage};

#[derive(Serialize)]
struct ErrorBody {
    stage: Stage,
    error: &'static str,
}

/// Maps a pipeline failure onto an HTTP response. The underlying cause is
/// logged, never sent to the client.
pub struct ApiError(pub PipelineError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match (self.0.stage(), self.0.cause()) {
            (_, Error::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            (Stage::Extraction, Error::Fetch { .. } | Error::Parse(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error generating images: {}", self.0);
        let body = ErrorBody {
            stage: self.0.stage(),
            error: self.0.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
