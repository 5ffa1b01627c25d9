mod details;
mod health;
mod routing;

pub use details::*;
pub use health::*;
pub use routing::*;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error answer: a status code plus a message the chat can show.
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
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<crate::upstream::Error> for ApiError {
    fn from(err: crate::upstream::Error) -> Self {
        use crate::upstream::Error;
        let status = match err {
            Error::MissingApiKey | Error::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Http(_) | Error::Status { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}
