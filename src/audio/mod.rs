pub mod format;
pub mod upload;
pub mod wav;

pub use format::{DeclaredPcm, PcmFormat};
pub use upload::TempUpload;
pub use wav::{encode_wav, ContainerError, WAV_HEADER_LEN};

/// Recorded audio travelling through one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    /// MIME/container tag, e.g. `audio/webm`
    pub mime_type: String,
}

impl AudioBlob {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
