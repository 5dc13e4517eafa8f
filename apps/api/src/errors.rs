use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// The two API keys the wizard depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    Anthropic,
    TheirStack,
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Anthropic => f.write_str("Claude API key"),
            Credential::TheirStack => f.write_str("TheirStack API key"),
        }
    }
}

/// Application-level error type.
/// Every failure ends the current action only; handlers return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please enter your {0} in the settings")]
    MissingCredential(Credential),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error processing file: {0}")]
    Extraction(String),

    #[error("Error analyzing resume: {0}")]
    Llm(String),

    #[error("API Error: {status} - {body}")]
    SearchApi { status: u16, body: String },

    #[error("Connection error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid step transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingCredential(_) => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
            AppError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            AppError::Extraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED"),
            AppError::Llm(_) => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            AppError::SearchApi { .. } => (StatusCode::BAD_GATEWAY, "SEARCH_API_ERROR"),
            AppError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Llm(_) | AppError::SearchApi { .. } | AppError::Network(_) => {
                tracing::error!("{self}");
                self.to_string()
            }
            _ => {
                tracing::warn!("{self}");
                self.to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_api_error_carries_status_and_body() {
        let err = AppError::SearchApi {
            status: 422,
            body: "{\"detail\":\"at least one filter required\"}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("422"));
        assert!(message.contains("at least one filter required"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::MissingCredential(Credential::TheirStack),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::UnsupportedFormat("csv".to_string()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AppError::InvalidTransition("x".to_string()),
                StatusCode::CONFLICT,
            ),
            (AppError::Network("down".to_string()), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_missing_credential_names_the_key() {
        let err = AppError::MissingCredential(Credential::Anthropic);
        assert_eq!(err.to_string(), "Please enter your Claude API key in the settings");
    }
}
