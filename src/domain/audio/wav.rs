//! Mono 16-bit PCM WAV codec
//!
//! Layout of the 44-byte canonical header:
//! ```text
//! [0-3]    "RIFF"
//! [4-7]    36 + data_size
//! [8-11]   "WAVE"
//! [12-15]  "fmt "
//! [16-19]  16 (PCM format chunk size)
//! [20-21]  1 (PCM format code)
//! [22-23]  1 (channels)
//! [24-27]  sample_rate
//! [28-31]  byte_rate = sample_rate * 2
//! [32-33]  block_align = 2
//! [34-35]  16 (bits per sample)
//! [36-39]  "data"
//! [40-43]  data_size
//! ```

use crate::domain::error::WavError;

/// Size of the canonical header in bytes
pub const WAV_HEADER_SIZE: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Convert one float sample to signed 16-bit PCM.
///
/// Negative values scale by 32768 and the rest by 32767 so both ends
/// of the range are reachable without overflow.
pub fn float_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Build the 44-byte header for `data_size` bytes of mono 16-bit PCM
pub fn wav_header(sample_rate: u32, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_size).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Encode float samples as a mono 16-bit WAV container
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<WavFile, WavError> {
    if samples.is_empty() {
        return Err(WavError::EmptyRecording);
    }

    let data_size = samples
        .len()
        .checked_mul(BYTES_PER_SAMPLE)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(36).is_some())
        .ok_or(WavError::TooLarge {
            samples: samples.len(),
        })?;

    let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    bytes.extend_from_slice(&wav_header(sample_rate, data_size));
    for &sample in samples {
        bytes.extend_from_slice(&float_to_pcm16(sample).to_le_bytes());
    }

    Ok(WavFile {
        bytes,
        sample_rate,
        sample_count: samples.len(),
    })
}

/// Samples read back from a mono 16-bit WAV container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWav {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

/// Decode a canonical mono 16-bit WAV container.
///
/// Rejects anything whose header disagrees with its payload.
pub fn decode_wav_mono16(bytes: &[u8]) -> Result<DecodedWav, WavError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(WavError::Malformed(format!(
            "{} bytes is shorter than the header",
            bytes.len()
        )));
    }

    let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);
    let u32_at = |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);

    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(WavError::Malformed("missing RIFF/WAVE markers".into()));
    }
    if &bytes[12..16] != b"fmt " || u32_at(16) != 16 || u16_at(20) != 1 {
        return Err(WavError::Malformed("fmt chunk is not plain PCM".into()));
    }
    if u16_at(22) != CHANNELS || u16_at(34) != BITS_PER_SAMPLE {
        return Err(WavError::Malformed(format!(
            "{} channel(s) at {} bits",
            u16_at(22),
            u16_at(34)
        )));
    }
    if &bytes[36..40] != b"data" {
        return Err(WavError::Malformed("missing data chunk".into()));
    }

    let data_size = u32_at(40) as usize;
    let payload = &bytes[WAV_HEADER_SIZE..];
    if payload.len() != data_size || u32_at(4) as usize != 36 + data_size {
        return Err(WavError::Malformed(format!(
            "declared {} data bytes, found {}",
            data_size,
            payload.len()
        )));
    }

    let samples = payload
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Ok(DecodedWav {
        sample_rate: u32_at(24),
        samples,
    })
}

/// Value object representing an encoded WAV file ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavFile {
    bytes: Vec<u8>,
    sample_rate: u32,
    sample_count: usize,
}

impl WavFile {
    /// Get the encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Length of the audio in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.sample_count as u64 * 1000 / self.sample_rate as u64
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
