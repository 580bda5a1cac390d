use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::audio::PcmFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub upstream: UpstreamConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Upper bound for request bodies (multipart uploads included)
    pub max_upload_bytes: usize,
    /// Directory with the browser client; served at `/` when set
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub transcription_model: String,
    pub synthesis_model: String,
    pub voice: String,
    pub transcription_prompt: String,
    pub synthesis_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// MIME type declared for every uploaded recording
    pub upload_mime: String,
    pub uploads_path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioConfig {
    pub fn pcm_format(&self) -> PcmFormat {
        PcmFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
            bits_per_sample: self.bits_per_sample,
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional file at `path`
    /// (any extension the `config` crate understands) and the environment.
    ///
    /// Environment overrides use the `VOICE_RELAY_` prefix with `__` between
    /// nested keys, e.g. `VOICE_RELAY_UPSTREAM__VOICE=Puck`. `GOOGLE_API_KEY`
    /// and `PORT` are honored as shortcuts.
    pub fn load(path: &str) -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("PORT is not a valid port number")?
            .map(i64::from);

        let settings = Self::defaults()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("VOICE_RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("upstream.api_key", std::env::var("GOOGLE_API_KEY").ok())?
            .set_override_option("service.http.port", port)?
            .build()
            .context("Failed to build configuration")?;

        Ok(settings.try_deserialize()?)
    }

    /// Built-in configuration, without file or environment sources.
    pub fn default_settings() -> Result<Self> {
        Ok(Self::defaults()?.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("service.name", "voice-relay")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 4000)?
            .set_default("service.http.max_upload_bytes", 25 * 1024 * 1024)?
            .set_default(
                "upstream.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("upstream.api_key", "")?
            .set_default("upstream.transcription_model", "gemini-2.5-flash")?
            .set_default("upstream.synthesis_model", "gemini-2.5-flash-preview-tts")?
            .set_default("upstream.voice", "Kore")?
            .set_default(
                "upstream.transcription_prompt",
                "Transcribe the following audio accurately:",
            )?
            .set_default("upstream.synthesis_prefix", "Say normally:")?
            .set_default("audio.upload_mime", "audio/webm")?
            .set_default("audio.uploads_path", "uploads")?
            .set_default("audio.sample_rate", 24000)?
            .set_default("audio.channels", 1)?
            .set_default("audio.bits_per_sample", 16)?)
    }
}
