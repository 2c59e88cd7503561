//! Application error taxonomy and its JSON rendering.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DuplicateResource(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Inactive user account")]
    InactiveAccount,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateResource(_) | Self::InactiveAccount => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::DuplicateResource(_) => "duplicate_resource",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized(_) => "unauthorized",
            Self::InactiveAccount => "inactive_account",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> String {
        match self {
            // never echo driver or internal messages to the caller
            Self::Database(_) | Self::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, code = self.code(), "request failed");
        }

        let body = Json(ErrorBody {
            code: self.code().to_string(),
            detail: self.detail(),
        });

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Option<String>, ErrorBody) {
        let res = err.into_response();
        let status = res.status();
        let www = res
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, www, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_is_422_with_code_and_detail() {
        let (status, _, body) = body_of(AppError::Validation("Password too short".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "validation_error");
        assert_eq!(body.detail, "Password too short");
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let (status, www, body) = body_of(AppError::Unauthorized("Missing token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(www.as_deref(), Some("Bearer"));
        assert_eq!(body.code, "unauthorized");
    }

    #[tokio::test]
    async fn internal_errors_hide_their_source() {
        let (status, _, body) =
            body_of(AppError::Internal(anyhow::anyhow!("connection refused at 10.0.0.3"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal_error");
        assert!(!body.detail.contains("10.0.0.3"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::DuplicateResource("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InactiveAccount.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Saved answer").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UpstreamUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
