use serde::{Deserialize, Serialize};

/// Layout of raw PCM samples (signed integer, little-endian, interleaved)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24000, // synthesis output rate
            channels: 1,        // Mono
            bits_per_sample: 16,
        }
    }
}

/// What an upstream mime type such as `audio/L16;codec=pcm;rate=24000`
/// declares about its payload. Fields are `None` when not stated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclaredPcm {
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

impl PcmFormat {
    /// Bytes per interleaved frame (one sample for every channel)
    pub fn block_align(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Parse the parameters of an inline-data mime type.
    ///
    /// Returns `None` when the type is not linear PCM (`audio/L16`,
    /// `audio/pcm` or a `codec=pcm` parameter), or when a `rate` or
    /// `channels` value is present but not a number.
    pub fn parse_mime(mime: &str) -> Option<DeclaredPcm> {
        let mut parts = mime.split(';').map(str::trim);
        let essence = parts.next()?.to_ascii_lowercase();

        let mut declared = DeclaredPcm::default();
        let mut pcm_codec = false;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => declared.sample_rate = Some(value.parse().ok()?),
                "channels" => declared.channels = Some(value.parse().ok()?),
                "codec" => pcm_codec = value.eq_ignore_ascii_case("pcm"),
                _ => {}
            }
        }

        let linear = matches!(essence.as_str(), "audio/l16" | "audio/pcm") || pcm_codec;
        linear.then_some(declared)
    }

    /// Check that a declared upstream format agrees with this one.
    pub fn accepts(&self, declared: &DeclaredPcm) -> bool {
        declared.sample_rate.map_or(true, |r| r == self.sample_rate)
            && declared.channels.map_or(true, |c| c == self.channels)
    }
}
