use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::messages::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::config::UpstreamConfig;
use crate::error::RelayError;

/// A successful (2xx, valid JSON) `generateContent` reply
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// Body as received, for diagnostics
    pub body: Value,
    pub response: GenerateContentResponse,
}

/// Client for the generative-language `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: UpstreamConfig,
}

impl GeminiClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Ask the transcription model to transcribe base64-encoded audio.
    ///
    /// The API key travels as the `key` query parameter.
    pub async fn transcribe(
        &self,
        audio_base64: String,
        mime_type: &str,
    ) -> Result<UpstreamReply, RelayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(self.config.transcription_prompt.clone()),
                    Part::inline(mime_type, audio_base64),
                ],
            }],
            generation_config: None,
        };

        info!(
            "Requesting transcription from {} ({})",
            self.config.transcription_model, mime_type
        );

        let response = self
            .http
            .post(self.endpoint(&self.config.transcription_model))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        read_reply(response).await
    }

    /// Ask the speech model to speak `text` with the configured voice.
    ///
    /// The API key travels in the `x-goog-api-key` header.
    pub async fn synthesize(&self, text: &str) -> Result<UpstreamReply, RelayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(format!("{} {}", self.config.synthesis_prefix, text))],
            }],
            generation_config: Some(GenerationConfig::audio(self.config.voice.clone())),
        };

        info!(
            "Requesting speech from {} (voice={}, {} chars)",
            self.config.synthesis_model,
            self.config.voice,
            text.chars().count()
        );

        let response = self
            .http
            .post(self.endpoint(&self.config.synthesis_model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        read_reply(response).await
    }
}

/// Read the body as text, parse it as JSON, then check the status.
async fn read_reply(response: reqwest::Response) -> Result<UpstreamReply, RelayError> {
    let status = response.status();
    let raw = response.text().await?;
    debug!("Upstream raw response ({}): {}", status, raw);

    let body: Value = match serde_json::from_str(&raw) {
        Ok(body) => body,
        Err(_) => return Err(RelayError::UpstreamNonJson { raw }),
    };

    if !status.is_success() {
        return Err(RelayError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    let response = GenerateContentResponse::from_body(&body);

    Ok(UpstreamReply { body, response })
}
