//! Relay error taxonomy and its HTTP mapping
//!
//! - client input: missing audio or text (400)
//! - upstream transport/parse: unreachable upstream or non-JSON body (500, raw text kept)
//! - upstream semantic: valid JSON with a failure status (500, body passed through)
//! - upstream contract: success status without the expected field (500)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::audio::ContainerError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No audio uploaded")]
    MissingAudio,

    #[error("Text required")]
    MissingText,

    #[error("Malformed upload: {0}")]
    BadUpload(String),

    #[error("Upload exceeds the size limit")]
    UploadTooLarge,

    #[error("Failed to reach upstream: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON from upstream")]
    UpstreamNonJson { raw: String },

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16, body: Value },

    #[error("No audio data returned")]
    NoAudioData { body: Value },

    #[error("Upstream audio format {mime_type} does not match the configured PCM layout")]
    UnexpectedAudioFormat { mime_type: String },

    #[error("Invalid audio payload: {0}")]
    InvalidAudio(#[from] base64::DecodeError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error("Upload storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Relay task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// JSON error body returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorResponse {
    fn message(msg: impl Into<String>) -> Self {
        Self {
            error: Value::String(msg.into()),
            raw: None,
            data: None,
        }
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingAudio | RelayError::MissingText | RelayError::BadUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        match self {
            RelayError::UpstreamNonJson { raw } => ErrorResponse {
                raw: Some(raw.clone()),
                ..ErrorResponse::message(self.to_string())
            },
            RelayError::UpstreamStatus { body, .. } => ErrorResponse {
                error: body.clone(),
                raw: None,
                data: None,
            },
            RelayError::NoAudioData { body } => ErrorResponse {
                data: Some(body.clone()),
                ..ErrorResponse::message(self.to_string())
            },
            _ => ErrorResponse::message(self.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Relay request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        (status, Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_errors_are_400() {
        assert_eq!(RelayError::MissingAudio.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MissingText.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(RelayError::MissingText.to_body()).unwrap(),
            json!({"error": "Text required"})
        );
    }

    #[test]
    fn test_oversized_upload_is_413() {
        let err = RelayError::UploadTooLarge;
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            serde_json::to_value(err.to_body()).unwrap(),
            json!({"error": "Upload exceeds the size limit"})
        );
    }

    #[test]
    fn test_non_json_keeps_raw_text() {
        let err = RelayError::UpstreamNonJson {
            raw: "<html>502 Bad Gateway</html>".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err.to_body()).unwrap(),
            json!({"error": "Invalid JSON from upstream", "raw": "<html>502 Bad Gateway</html>"})
        );
    }

    #[test]
    fn test_upstream_status_passes_body_through() {
        let upstream = json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}});
        let err = RelayError::UpstreamStatus {
            status: 403,
            body: upstream.clone(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err.to_body()).unwrap(),
            json!({ "error": upstream })
        );
    }

    #[test]
    fn test_missing_audio_is_distinct_from_upstream_error() {
        let body = json!({"candidates": []});
        let err = RelayError::NoAudioData { body: body.clone() };
        assert_eq!(
            serde_json::to_value(err.to_body()).unwrap(),
            json!({"error": "No audio data returned", "data": body})
        );
    }
}
