use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `generateContent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content entry: text or inline media
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: Some(mime_type.into()),
                data: Some(data),
            }),
        }
    }
}

/// Base64 media embedded in a part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub speech_config: SpeechConfig,
}

impl GenerationConfig {
    /// Request spoken audio in the given prebuilt voice
    pub fn audio(voice: impl Into<String>) -> Self {
        Self {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.into(),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

/// `generateContent` response body.
///
/// Every level is optional upstream, so extraction goes through
/// [`GenerateContentResponse::first_part`] rather than indexing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Decode only `candidates[0].content.parts[0]` from a reply body.
    ///
    /// Later candidates and parts are never looked at, so a malformed
    /// sibling cannot hide the first part. An unexpected shape on the path
    /// itself reads as missing.
    pub fn from_body(body: &Value) -> Self {
        let first = body
            .pointer("/candidates/0/content/parts/0")
            .and_then(|part| Part::deserialize(part).ok());

        Self {
            candidates: first
                .map(|part| Candidate {
                    content: Some(Content { parts: vec![part] }),
                })
                .into_iter()
                .collect(),
        }
    }

    /// `candidates[0].content.parts[0]`
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates.first()?.content.as_ref()?.parts.first()
    }

    /// Non-empty text of the first part
    pub fn text(&self) -> Option<&str> {
        self.first_part()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Inline media of the first part, when it carries a non-empty payload
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.first_part()?
            .inline_data
            .as_ref()
            .filter(|d| d.data.as_deref().is_some_and(|data| !data.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcription_request_wire_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text("Transcribe the following audio accurately:"),
                    Part::inline("audio/webm", "AAEC".to_string()),
                ],
            }],
            generation_config: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "Transcribe the following audio accurately:"},
                        {"inlineData": {"mimeType": "audio/webm", "data": "AAEC"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_synthesis_generation_config_shape() {
        let value = serde_json::to_value(GenerationConfig::audio("Kore")).unwrap();
        assert_eq!(
            value,
            json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Kore"}}
                }
            })
        );
    }

    #[test]
    fn test_text_extraction() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "hello there"}], "role": "model"}}],
            "usageMetadata": {"totalTokenCount": 12}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("hello there"));
    }

    #[test]
    fn test_missing_levels_yield_none() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(body.clone()).unwrap();
            assert!(response.text().is_none(), "expected no text for {}", body);
            assert!(response.inline_data().is_none());
        }
    }

    #[test]
    fn test_inline_data_extraction() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{
                "inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAA="}
            }]}}]
        }))
        .unwrap();

        let inline = response.inline_data().unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("audio/L16;codec=pcm;rate=24000"));
        assert_eq!(inline.data.as_deref(), Some("AAA="));
    }

    #[test]
    fn test_malformed_sibling_candidate_keeps_first_text() {
        let response = GenerateContentResponse::from_body(&json!({
            "candidates": [
                {"content": {"parts": [{"text": "hello"}]}},
                {"content": "filtered"}
            ]
        }));
        assert_eq!(response.text(), Some("hello"));

        let response = GenerateContentResponse::from_body(&json!({
            "candidates": [{"content": {"parts": [{"text": "first"}, {"text": 42}]}}]
        }));
        assert_eq!(response.text(), Some("first"));
    }

    #[test]
    fn test_unexpected_shape_on_path_reads_as_missing() {
        for body in [
            json!({"candidates": "not-a-list"}),
            json!({"candidates": [{"content": "filtered"}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 42}]}}]}),
            json!([1, 2, 3]),
        ] {
            let response = GenerateContentResponse::from_body(&body);
            assert!(response.first_part().is_none(), "expected no part for {}", body);
        }
    }

    #[test]
    fn test_empty_inline_payload_is_absent() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"data": ""}}]}}]
        }))
        .unwrap();
        assert!(response.inline_data().is_none());
    }
}
