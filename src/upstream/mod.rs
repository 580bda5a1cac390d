//! Generative-AI upstream API (`models/*:generateContent`)

pub mod client;
pub mod messages;

pub use client::{GeminiClient, UpstreamReply};
pub use messages::{GenerateContentRequest, GenerateContentResponse, InlineData, Part};
