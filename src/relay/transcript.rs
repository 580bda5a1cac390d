use serde::Serialize;

/// Text returned to clients when the upstream reply carries no transcript
pub const NO_TRANSCRIPT: &str = "No transcript found";

/// Outcome of a successful transcription round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Text(String),
    /// The upstream answered successfully but without text at the expected path
    NotFound,
}

impl Transcript {
    pub fn from_upstream(text: Option<&str>) -> Self {
        match text {
            Some(text) => Transcript::Text(text.to_string()),
            None => Transcript::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Transcript::Text(_))
    }

    /// Text for display, substituting [`NO_TRANSCRIPT`]
    pub fn into_text(self) -> String {
        match self {
            Transcript::Text(text) => text,
            Transcript::NotFound => NO_TRANSCRIPT.to_string(),
        }
    }
}

/// `200` body of `POST /transcribe`
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

impl From<Transcript> for TranscribeResponse {
    fn from(transcript: Transcript) -> Self {
        Self {
            text: transcript.into_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_text_is_kept_verbatim() {
        let transcript = Transcript::from_upstream(Some("  Hello, world.\n"));
        assert!(transcript.is_found());
        assert_eq!(transcript.into_text(), "  Hello, world.\n");
    }

    #[test]
    fn test_missing_text_uses_sentinel() {
        let transcript = Transcript::from_upstream(None);
        assert!(!transcript.is_found());
        assert_eq!(TranscribeResponse::from(transcript).text, NO_TRANSCRIPT);
    }
}
