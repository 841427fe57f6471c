use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{api::api_structs::ErrorResponse, model::pipeline::SubmissionError, render::RenderError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Request body is not a valid render request: {0}")]
    InvalidRenderRequest(#[source] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError)
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Submission(SubmissionError::ReferenceUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Submission(_) | ApiError::InvalidRenderRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Short summary for the `error` field of the response body.
    pub fn summary(&self) -> &'static str {
        match self {
            ApiError::Submission(SubmissionError::ReferenceUnavailable) => "Reference data unavailable",
            ApiError::Submission(SubmissionError::InvalidRecord(_)) => "Invalid record",
            ApiError::Submission(_) | ApiError::InvalidRenderRequest(_) => "Invalid input",
            ApiError::Render(_) => "Failed to render chart"
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}: {self}", self.summary());
        } else {
            warn!("{}: {self}", self.summary());
        }

        let body = Json(ErrorResponse {
            error: self.summary().to_string(),
            details: self.to_string()
        });

        (status, body).into_response()
    }
}
