use super::state::AppState;
use crate::audio::AudioBlob;
use crate::error::RelayError;
use crate::relay::TranscribeResponse;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{debug, info};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transcribe
/// Transcribe the recording in multipart field `audio`
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, RelayError> {
    // Without a multipart body there is no file to transcribe
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Not a multipart upload: {}", rejection.body_text());
        RelayError::MissingAudio
    })?;

    let mut audio = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        let bytes = field.bytes().await.map_err(upload_error)?;
        audio = Some(bytes);
    }

    let bytes = match audio {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(RelayError::MissingAudio),
    };

    info!("Received {} byte recording", bytes.len());
    let blob = AudioBlob::new(bytes.to_vec(), state.relay.upload_mime());

    // Detached so the upstream call and upload cleanup finish even if the
    // client goes away mid-request
    let relay = state.relay.clone();
    let transcript = tokio::spawn(async move { relay.transcribe(blob).await }).await??;

    Ok(Json(transcript.into()))
}

/// POST /synthesize
/// Speak `text` and return a WAV file
pub async fn synthesize(
    State(state): State<AppState>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let text = match payload {
        Ok(Json(SynthesizeRequest { text: Some(text) })) if !text.is_empty() => text,
        Ok(_) => return Err(RelayError::MissingText),
        Err(rejection) => {
            debug!("Unreadable synthesis request: {}", rejection.body_text());
            return Err(RelayError::MissingText);
        }
    };

    let relay = state.relay.clone();
    let audio = tokio::spawn(async move { relay.synthesize(&text).await }).await??;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, audio.content_type)],
        audio.bytes,
    )
        .into_response())
}

/// Oversized bodies are 413; any other framing error is a bad upload
fn upload_error(e: MultipartError) -> RelayError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::UploadTooLarge
    } else {
        RelayError::BadUpload(e.body_text())
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
