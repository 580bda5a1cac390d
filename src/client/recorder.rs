use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::capture::{AudioCapture, AudioChunk};
use super::relay_client::RelayClient;
use crate::audio::AudioBlob;

/// Recorder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Idle,
    Recording,
    StoppedReady,
    Uploading,
}

/// Records through an [`AudioCapture`] backend and uploads the result for
/// transcription.
///
/// Transitions: `Idle → Recording` (start, needs permission),
/// `Recording → StoppedReady` (stop, flushes chunks),
/// `StoppedReady → Uploading → StoppedReady` (upload, success or failure).
/// Every transition leaves a human-readable status message behind.
pub struct Recorder<C: AudioCapture> {
    capture: C,
    state: RecorderState,
    status: String,
    audio_rx: Option<mpsc::Receiver<AudioChunk>>,
    chunks: Vec<AudioChunk>,
    transcript: Option<String>,
}

impl<C: AudioCapture> Recorder<C> {
    pub fn new(capture: C) -> Self {
        Self {
            capture,
            state: RecorderState::Idle,
            status: String::new(),
            audio_rx: None,
            chunks: Vec::new(),
            transcript: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    /// Total bytes captured by the last recording
    pub fn recorded_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        info!("Recorder [{:?}]: {}", self.state, self.status);
    }

    /// Begin a new recording. No-op while already recording.
    pub async fn start(&mut self) -> Result<()> {
        if matches!(self.state, RecorderState::Recording | RecorderState::Uploading) {
            return Ok(());
        }

        self.transcript = None;
        self.set_status("Asking for microphone permission...");

        let started = match self.capture.request_permission().await {
            Ok(()) => self.capture.start().await,
            Err(e) => Err(e),
        };

        match started {
            Ok(rx) => {
                self.audio_rx = Some(rx);
                self.chunks.clear();
                self.state = RecorderState::Recording;
                self.set_status("Recording...");
                Ok(())
            }
            Err(e) => {
                error!("Failed to start {} capture: {:#}", self.capture.name(), e);
                self.set_status(format!("Microphone permission denied or error: {:#}", e));
                Err(e)
            }
        }
    }

    /// Stop recording and collect every buffered chunk.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Ok(());
        }

        let mut chunks = Vec::new();
        let stopped = match self.audio_rx.take() {
            Some(mut rx) => {
                let drain = async {
                    while let Some(chunk) = rx.recv().await {
                        if !chunk.is_empty() {
                            chunks.push(chunk);
                        }
                    }
                };
                let (stopped, ()) = tokio::join!(self.capture.stop(), drain);
                stopped
            }
            None => self.capture.stop().await,
        };

        self.chunks = chunks;
        self.state = RecorderState::StoppedReady;
        self.set_status("Recording stopped. Ready to upload.");
        stopped
    }

    /// Upload the last recording and keep the transcript.
    ///
    /// Returns the status message; the recorder is back in `StoppedReady`
    /// afterwards whether the upload succeeded or not.
    pub async fn upload(&mut self, client: &RelayClient) -> Result<String> {
        if self.state != RecorderState::StoppedReady || self.chunks.is_empty() {
            self.set_status("No recording available. Please record first.");
            anyhow::bail!("{}", self.status);
        }

        self.state = RecorderState::Uploading;
        self.set_status("Uploading audio...");

        let blob = AudioBlob::new(self.chunks.concat(), self.capture.mime_type());
        let result = client.transcribe(&blob).await;

        self.state = RecorderState::StoppedReady;
        match result {
            Ok(text) => {
                self.transcript = Some(text.clone());
                self.set_status("Transcription complete.");
                Ok(text)
            }
            Err(e) => {
                self.set_status(format!("Transcription failed: {:#}", e));
                Err(e)
            }
        }
    }
}
