use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use super::format::PcmFormat;

/// Size of the RIFF/WAVE header written in front of 16-bit PCM data
pub const WAV_HEADER_LEN: usize = 44;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("PCM payload of {len} bytes is not a whole number of {block_align}-byte frames")]
    PartialFrame { len: usize, block_align: usize },

    #[error("unsupported PCM bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("failed to write WAV container: {0}")]
    Wav(#[from] hound::Error),
}

/// Wrap raw 16-bit little-endian PCM bytes in a WAV container.
///
/// The output is `WAV_HEADER_LEN + pcm.len()` bytes long.
pub fn encode_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, ContainerError> {
    if format.bits_per_sample != 16 {
        return Err(ContainerError::UnsupportedBitDepth(format.bits_per_sample));
    }

    let block_align = format.block_align();
    if block_align == 0 || pcm.len() % block_align != 0 {
        return Err(ContainerError::PartialFrame {
            len: pcm.len(),
            block_align,
        });
    }

    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + pcm.len()));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        writer.finalize()?;
    }

    let wav = cursor.into_inner();
    debug!(
        "Framed {} PCM bytes as WAV ({}Hz, {}ch, {}-bit): {} bytes",
        pcm.len(),
        format.sample_rate,
        format.channels,
        format.bits_per_sample,
        wav.len()
    );

    Ok(wav)
}
