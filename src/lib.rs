pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod relay;
pub mod upstream;

pub use audio::{encode_wav, AudioBlob, PcmFormat, TempUpload};
pub use client::{AudioCapture, FileCapture, LocalSpeech, Recorder, RecorderState, RelayClient, SynthesisReply};
pub use config::Config;
pub use error::RelayError;
pub use http::{create_router, AppState};
pub use relay::{Relay, SynthesizedAudio, Transcript};
pub use upstream::GeminiClient;
