use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde_json::{json, Value};
use tracing::info;

use crate::audio::AudioBlob;
use crate::http::AUDIO_FIELD;
use crate::relay::WAV_CONTENT_TYPE;

/// Filename sent with uploaded recordings
const UPLOAD_FILE_NAME: &str = "recording.webm";

/// What `POST /synthesize` answered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisReply {
    /// Playable media with its declared content type
    Audio { content_type: String, bytes: Vec<u8> },
    /// A JSON body delivered with a success status instead of audio
    Message(String),
}

/// HTTP client for a running relay
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upload a recording and return its transcript
    pub async fn transcribe(&self, blob: &AudioBlob) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(blob.bytes.clone())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(&blob.mime_type)?;
        let form = reqwest::multipart::Form::new().part(AUDIO_FIELD, part);

        let response = self
            .http
            .post(format!("{}/transcribe", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("Failed to upload recording")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse transcription response")?;
        let text = body["text"].as_str().unwrap_or_default().to_string();

        info!("Relay transcribed {} bytes into {} chars", blob.bytes.len(), text.len());
        Ok(text)
    }

    /// Ask the relay to speak `text`.
    ///
    /// The declared content type decides how the body is read: JSON is a
    /// message, anything else is audio.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisReply> {
        let response = self
            .http
            .post(format!("{}/synthesize", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("Failed to request synthesis")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.contains("application/json") {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = describe_error(&body).unwrap_or_else(|| "No audio returned".to_string());
            return Ok(SynthesisReply::Message(message));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read synthesized audio")?
            .to_vec();

        info!("Relay returned {} bytes of {}", bytes.len(), content_type);

        Ok(SynthesisReply::Audio {
            content_type: if content_type.is_empty() {
                WAV_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
            bytes,
        })
    }
}

/// The `error` field of a JSON error body, or the status reason
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();

    body.as_ref()
        .and_then(describe_error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

fn describe_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/synthesize")
            .match_body(mockito::Matcher::Json(json!({"text": "hi"})))
            .with_status(200)
            .with_header("content-type", "audio/wav")
            .with_body(b"RIFF....WAVE")
            .create_async()
            .await;

        let reply = RelayClient::new(server.url()).synthesize("hi").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            reply,
            SynthesisReply::Audio {
                content_type: "audio/wav".to_string(),
                bytes: b"RIFF....WAVE".to_vec()
            }
        );
    }

    #[tokio::test]
    async fn test_synthesize_json_reply_is_a_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/synthesize")
            .with_status(200)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(r#"{"error":"No audio data returned"}"#)
            .create_async()
            .await;

        let reply = RelayClient::new(server.url()).synthesize("hi").await.unwrap();

        assert_eq!(reply, SynthesisReply::Message("No audio data returned".to_string()));
    }

    #[tokio::test]
    async fn test_synthesize_error_surfaces_upstream_object() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/synthesize")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":400,"message":"bad voice"}}"#)
            .create_async()
            .await;

        let err = RelayClient::new(server.url()).synthesize("hi").await.unwrap_err();

        assert!(err.to_string().contains("bad voice"), "{}", err);
    }

    #[tokio::test]
    async fn test_error_without_json_uses_status_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/transcribe")
            .with_status(502)
            .with_body("gateway down")
            .create_async()
            .await;

        let blob = AudioBlob::new(vec![1, 2, 3], "audio/webm");
        let err = RelayClient::new(server.url()).transcribe(&blob).await.unwrap_err();

        assert_eq!(err.to_string(), "Bad Gateway");
    }
}
