use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use paperbrief_common::PaperBriefError;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// HTTP-facing error
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// 400 with the given detail
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.detail)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            detail: self.detail.clone(),
        })
    }
}

impl From<PaperBriefError> for ApiError {
    fn from(err: PaperBriefError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let detail = match &err {
            // Validation messages are returned verbatim
            PaperBriefError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        Self::new(status, detail)
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        Self::bad_request(format!("Invalid multipart payload: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        PaperBriefError::from(err).into()
    }
}

/// Shorthand for handler results
pub type ApiResult<T> = Result<T, ApiError>;
