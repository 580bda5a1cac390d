//! The two relay operations
//!
//! - transcription: uploaded recording → base64 → upstream → transcript text
//! - synthesis: text → upstream → base64 PCM → WAV container

mod service;
mod transcript;

pub use service::{Relay, SynthesizedAudio, WAV_CONTENT_TYPE};
pub use transcript::{TranscribeResponse, Transcript, NO_TRANSCRIPT};
