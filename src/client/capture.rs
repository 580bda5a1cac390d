use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Encoded audio chunk as handed over by a capture backend
pub type AudioChunk = Vec<u8>;

/// Audio capture backend trait
///
/// Implementations:
/// - File: replays an existing recording (CLI, tests)
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Ask for access to the input device; nothing is captured on failure
    async fn request_permission(&mut self) -> Result<()>;

    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive encoded chunks. The
    /// channel closes once the backend has flushed its last chunk.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// MIME/container tag of the produced chunks
    fn mime_type(&self) -> &str;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Replays an encoded recording from disk in fixed-size chunks
pub struct FileCapture {
    path: PathBuf,
    mime_type: String,
    chunk_size: usize,
    reader: Option<JoinHandle<Result<()>>>,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            chunk_size: 16 * 1024,
            reader: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[async_trait::async_trait]
impl AudioCapture for FileCapture {
    async fn request_permission(&mut self) -> Result<()> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Cannot access {}", self.path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a file", self.path.display());
        }
        Ok(())
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        if self.reader.is_some() {
            anyhow::bail!("{} capture already started", self.name());
        }

        let mut file = tokio::fs::File::open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let chunk_size = self.chunk_size;
        let (tx, rx) = mpsc::channel(32);

        info!("Replaying {} as {}", self.path.display(), self.mime_type);

        self.reader = Some(tokio::spawn(async move {
            loop {
                let mut chunk = vec![0u8; chunk_size];
                let n = file.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                chunk.truncate(n);
                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
            Ok::<(), anyhow::Error>(())
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        // A file recording is already complete; stopping flushes the remainder
        if let Some(reader) = self.reader.take() {
            if let Err(e) = reader.await.context("File capture task panicked")? {
                warn!("File capture ended early: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.reader.is_some()
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn name(&self) -> &str {
        "file"
    }
}
