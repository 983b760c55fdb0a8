use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_shared::{ErrorBody, ErrorKind};
use thiserror::Error;

/// Every failure the contact endpoint can answer with.
///
/// The `Display` form is the `error` field of the response body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Timeout(String),

    #[error("Failed to send email")]
    TransportRejected(String),

    #[error("Failed to send email")]
    Malformed(String),

    #[error("Failed to send email")]
    Unknown(String),
}

impl AppError {
    /// Build the error for a failed dispatch.
    pub fn from_failure(kind: ErrorKind, detail: String) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation(detail),
            ErrorKind::Timeout => Self::Timeout(detail),
            ErrorKind::TransportRejected => Self::TransportRejected(detail),
            ErrorKind::Unknown => Self::Unknown(detail),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::TransportRejected(_) => ErrorKind::TransportRejected,
            Self::Malformed(_) | Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let kind = self.kind();

        let detail = match &self {
            AppError::TransportRejected(detail)
            | AppError::Malformed(detail)
            | AppError::Unknown(detail) => Some(detail.as_str()),
            _ => None,
        };

        if status_code.is_server_error() {
            tracing::error!(code = %kind, error = %self, detail = ?detail, "Error sending email");
        } else {
            tracing::info!(code = %kind, error = %self, "Contact submission rejected");
        }

        let error = self.to_string();
        // only transport messages are meant for the sender's eyes
        let details = match self {
            AppError::TransportRejected(detail) => Some(detail),
            _ => None,
        };

        let body = ErrorBody {
            error,
            details,
            code: Some(kind),
        };

        (status_code, Json(body)).into_response()
    }
}
