//! Error taxonomy shared by the match, roster and balancing operations.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

/// Every failure an API operation can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A referenced member or match does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("{0}")]
    InvalidInput(String),

    /// The rank service answered with something we cannot use.
    #[error("rank service error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn member_not_found(id: impl ToString) -> Self {
        ApiError::NotFound {
            what: "member",
            id: id.to_string(),
        }
    }

    pub fn match_not_found(id: impl ToString) -> Self {
        ApiError::NotFound {
            what: "match",
            id: id.to_string(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidInput(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Internal(e) => {
                log::error!("internal error: {e:?}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
