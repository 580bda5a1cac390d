use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_relay::{
    http, AppState, Config, FileCapture, LocalSpeech, Recorder, RelayClient, SynthesisReply,
};

#[derive(Parser)]
#[command(name = "voice-relay", version, about = "Speech-to-text and text-to-speech relay")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(long, default_value = "config/voice-relay")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP relay
    Serve,

    /// Upload a recording to a running relay and print the transcript
    Transcribe {
        /// Recorded audio file
        #[arg(long)]
        file: PathBuf,

        /// MIME type of the recording
        #[arg(long, default_value = "audio/webm")]
        mime: String,

        #[arg(long, default_value = "http://localhost:4000")]
        server: String,
    },

    /// Speak text through a running relay (or locally with --local)
    Synthesize {
        #[arg(long)]
        text: String,

        /// Where to write the returned audio
        #[arg(long, default_value = "speech.wav")]
        out: PathBuf,

        /// Use the platform synthesizer instead of the relay
        #[arg(long)]
        local: bool,

        #[arg(long, default_value = "http://localhost:4000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve(&cli.config).await,
        Command::Transcribe { file, mime, server } => transcribe(file, mime, server).await,
        Command::Synthesize {
            text,
            out,
            local,
            server,
        } => synthesize(text, out, local, server).await,
    }
}

async fn serve(config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Upstream: {} (stt={}, tts={}, voice={})",
        cfg.upstream.base_url,
        cfg.upstream.transcription_model,
        cfg.upstream.synthesis_model,
        cfg.upstream.voice
    );
    info!("Uploads parked in {}", cfg.audio.uploads_path.display());
    if cfg.upstream.api_key.is_empty() {
        warn!("No upstream API key configured; set GOOGLE_API_KEY");
    }
    if let Some(dir) = &cfg.service.http.static_dir {
        info!("Serving browser client from {}", dir.display());
    }

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    http::serve(&addr, AppState::new(&cfg)).await
}

async fn transcribe(file: PathBuf, mime: String, server: String) -> Result<()> {
    let mut recorder = Recorder::new(FileCapture::new(file, mime));

    recorder.start().await?;
    recorder.stop().await?;
    let text = recorder.upload(&RelayClient::new(server)).await?;

    println!("{}", text);
    Ok(())
}

async fn synthesize(text: String, out: PathBuf, local: bool, server: String) -> Result<()> {
    if local {
        if let Some(handle) = LocalSpeech::default().speak(&text) {
            handle.await?;
        }
        return Ok(());
    }

    match RelayClient::new(server).synthesize(&text).await? {
        SynthesisReply::Audio {
            content_type,
            bytes,
        } => {
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!("Wrote {} bytes of {} to {}", bytes.len(), content_type, out.display());
        }
        SynthesisReply::Message(message) => {
            anyhow::bail!("Server TTS response: {}", message);
        }
    }

    Ok(())
}
