use base64::Engine;
use std::path::PathBuf;
use tracing::{info, warn};

use super::transcript::Transcript;
use crate::audio::{encode_wav, AudioBlob, PcmFormat, TempUpload};
use crate::config::Config;
use crate::error::RelayError;
use crate::upstream::GeminiClient;

/// Content type of synthesized audio
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// A playable container produced by the synthesis relay
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Forwards transcription and synthesis requests to the upstream API.
///
/// Holds no per-request state; each call owns its temp file and buffers.
#[derive(Debug, Clone)]
pub struct Relay {
    upstream: GeminiClient,
    uploads_path: PathBuf,
    upload_mime: String,
    pcm_format: PcmFormat,
}

impl Relay {
    pub fn new(config: &Config) -> Self {
        Self {
            upstream: GeminiClient::new(config.upstream.clone()),
            uploads_path: config.audio.uploads_path.clone(),
            upload_mime: config.audio.upload_mime.clone(),
            pcm_format: config.audio.pcm_format(),
        }
    }

    pub fn upload_mime(&self) -> &str {
        &self.upload_mime
    }

    /// Transcribe an uploaded recording.
    ///
    /// The upload is parked in the uploads directory while the upstream call
    /// runs and removed on every exit path, errors included.
    pub async fn transcribe(&self, blob: AudioBlob) -> Result<Transcript, RelayError> {
        if blob.is_empty() {
            return Err(RelayError::MissingAudio);
        }

        let upload = TempUpload::store(&self.uploads_path, &blob.bytes).await?;
        drop(blob);

        let result = self.transcribe_stored(&upload).await;

        if let Err(e) = upload.release() {
            warn!("Failed to remove upload after transcription: {}", e);
        }

        result
    }

    async fn transcribe_stored(&self, upload: &TempUpload) -> Result<Transcript, RelayError> {
        let bytes = upload.read().await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let reply = self.upstream.transcribe(encoded, &self.upload_mime).await?;
        let transcript = Transcript::from_upstream(reply.response.text());

        match &transcript {
            Transcript::Text(text) => {
                info!("Transcribed {} bytes into {} chars", bytes.len(), text.chars().count())
            }
            Transcript::NotFound => warn!("Upstream reply carried no transcript"),
        }

        Ok(transcript)
    }

    /// Speak `text` through the upstream API and frame the PCM reply as WAV.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, RelayError> {
        if text.is_empty() {
            return Err(RelayError::MissingText);
        }

        let reply = self.upstream.synthesize(text).await?;

        let Some(inline) = reply.response.inline_data() else {
            return Err(RelayError::NoAudioData { body: reply.body });
        };

        if let Some(mime_type) = inline.mime_type.as_deref() {
            let accepted = PcmFormat::parse_mime(mime_type)
                .is_some_and(|declared| self.pcm_format.accepts(&declared));
            if !accepted {
                return Err(RelayError::UnexpectedAudioFormat {
                    mime_type: mime_type.to_string(),
                });
            }
        }

        let data = inline.data.as_deref().unwrap_or_default();
        let pcm = base64::engine::general_purpose::STANDARD.decode(data)?;
        let bytes = encode_wav(&pcm, self.pcm_format)?;

        info!(
            "Synthesized {} PCM bytes ({}Hz, {}ch) into {} byte WAV",
            pcm.len(),
            self.pcm_format.sample_rate,
            self.pcm_format.channels,
            bytes.len()
        );

        Ok(SynthesizedAudio {
            content_type: WAV_CONTENT_TYPE,
            bytes,
        })
    }
}
