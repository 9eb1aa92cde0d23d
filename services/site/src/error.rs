use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure reported by the external identity provider.
///
/// Surfaced to clients only as a generic `PROVIDER_ERROR`; the detail is logged.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rejected the access token")]
    InvalidToken,
    #[error("provider unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

/// Site service error variants.
///
/// Passcode outcomes (not found, expired, mismatch, delivery failed on
/// `/otp/send`) are not errors; they travel as `success: false` bodies.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid email format")]
    InvalidEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("sign-in required")]
    Unauthorized,
    #[error("email mismatch, sign in with the verified email")]
    EmailMismatch,
    #[error("insufficient role")]
    Forbidden,
    #[error("submission not found")]
    SubmissionNotFound,
    #[error("identity provider error")]
    Provider(#[from] ProviderError),
    #[error("failed to send passcode, please try again")]
    DeliveryFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SiteError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::EmailMismatch => "EMAIL_MISMATCH",
            Self::Forbidden => "FORBIDDEN",
            Self::SubmissionNotFound => "SUBMISSION_NOT_FOUND",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<JsonRejection> for SiteError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidBody(_) | Self::MissingField(_) | Self::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::Unauthorized | Self::EmailMismatch => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::SubmissionNotFound => StatusCode::NOT_FOUND,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::DeliveryFailed => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and already visible in the TraceLayer span.
        // Upstream failures keep their cause in the log; the body stays generic.
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::Provider(e) => tracing::warn!(error = %e, kind = "PROVIDER_ERROR", "provider error"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
