use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;
use forecast::ModelError;
use serde_json::json;
use tracing::{error, warn};

/// Error body for every route: `{"error": message}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn status_from_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidHours { .. } | EngineError::InvalidWindow { .. } => {
            StatusCode::BAD_REQUEST
        }
        EngineError::UnknownStrategy(_) | EngineError::Model(ModelError::Unknown(_)) => {
            StatusCode::NOT_FOUND
        }
        EngineError::NoData { .. } | EngineError::InsufficientData { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::Upstream(_) => StatusCode::BAD_GATEWAY,
        EngineError::Model(ModelError::Failed { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), "request failed: {}", self.message);
        } else {
            warn!(status = self.status.as_u16(), "request rejected: {}", self.message);
        }
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}
