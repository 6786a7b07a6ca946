use salvo::http::StatusCode;
use salvo::Response;
use salvo::writing::{Json, Scribe};
use serde_json::json;
use thiserror::Error;

use almanac_engine::EngineError;
use almanac_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    EngineError(#[from] EngineError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        use almanac_core::error::CoreError;

        match self {
            Self::BadRequest(_)
            | Self::EngineError(_)
            | Self::CoreError(CoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceError(err) => match err {
                ServiceError::EngineError(_)
                | ServiceError::ValidationError(_)
                | ServiceError::CoreError(CoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
                ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::CoreError(_)
                | ServiceError::InvalidConfiguration(_)
                | ServiceError::InvariantViolation(_)
                | ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl Scribe for AppError {
    fn render(self, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
            res.status_code(status);
            res.render(Json(json!({ "error": "Internal server error" })));
            return;
        }

        tracing::debug!(error = %self, %status, "Request rejected");
        res.status_code(status);
        res.render(Json(json!({ "error": self.to_string() })));
    }
}
