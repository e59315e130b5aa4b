// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the portfolio API.

use crate::gate::Rejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Mail dispatch failed: {0}")]
    Mail(#[source] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Rejected(rejection) => {
                info!(reason = %rejection, "Submission rejected");
                let status = if rejection.is_rate_limited() {
                    StatusCode::TOO_MANY_REQUESTS
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, rejection.to_string())
            }
            Self::Mail(source) => {
                error!(error = %source, "Mail dispatch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send message. Please try again.".to_string(),
                )
            }
            // store and serialization failures stay generic to the client
            Self::Database(source) => {
                error!(error = %source, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::Serialization(source) => {
                error!(error = %source, "Serialization failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::Internal(message) => {
                error!(%message, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut response = (status, Json(ErrorBody { message })).into_response();

        if let Self::Rejected(Rejection::RateLimited { retry_after }) = &self {
            if let Ok(value) = retry_after.as_secs().to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rejection_status_mapping() {
        let response = AppError::Rejected(Rejection::CaptchaMismatch).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Rejected(Rejection::RateLimited {
            retry_after: Duration::from_secs(12),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("Retry-After").unwrap(),
            &"12".parse::<axum::http::HeaderValue>().unwrap()
        );
    }

    #[test]
    fn test_not_found_is_404() {
        let response = AppError::NotFound("Project not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
