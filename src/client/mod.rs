//! Client side of the relay
//!
//! - `Recorder`: idle → recording → stopped-ready ⇄ uploading
//! - `RelayClient`: calls `/transcribe` and `/synthesize`
//! - `LocalSpeech`: platform speech without the relay

mod capture;
mod recorder;
mod relay_client;
mod speech;

pub use capture::{AudioCapture, AudioChunk, FileCapture};
pub use recorder::{Recorder, RecorderState};
pub use relay_client::{RelayClient, SynthesisReply};
pub use speech::LocalSpeech;
