//! Input validation utilities for codec operations

use crate::error::{CodecError, Result};
use crate::types::{CodecType, SampleRate};

/// Validate that samples form whole coding vectors
pub fn validate_vector_alignment(samples: &[i16], vector_size: usize) -> Result<()> {
    if samples.len() % vector_size != 0 {
        return Err(CodecError::PartialVector {
            samples: samples.len(),
            vector_size,
        });
    }

    Ok(())
}

/// Validate that encoded data holds whole index words
pub fn validate_index_stream(data: &[u8], word_size: usize) -> Result<()> {
    let trailing_bytes = data.len() % word_size;
    if trailing_bytes != 0 {
        return Err(CodecError::TruncatedStream { trailing_bytes });
    }

    Ok(())
}

/// Validate sample rate for a specific codec
pub fn validate_sample_rate(codec_type: CodecType, sample_rate: SampleRate) -> Result<()> {
    let supported_rates = codec_type.supported_sample_rates();
    let rate_hz = sample_rate.hz();

    if !supported_rates.contains(&rate_hz) {
        return Err(CodecError::InvalidSampleRate {
            rate: rate_hz,
            supported: supported_rates.to_vec(),
        });
    }

    Ok(())
}

/// Validate channel count for a specific codec
pub fn validate_channels(codec_type: CodecType, channels: u8) -> Result<()> {
    let supported_channels = codec_type.supported_channels();

    if !supported_channels.contains(&channels) {
        return Err(CodecError::InvalidChannelCount {
            channels,
            supported: supported_channels.to_vec(),
        });
    }

    Ok(())
}

/// Validate an output buffer against the size an operation needs
pub fn validate_buffer_size(needed: usize, actual: usize) -> Result<()> {
    if actual < needed {
        return Err(CodecError::BufferTooSmall { needed, actual });
    }

    Ok(())
}

/// Validate a PCM scale factor
pub fn validate_scale(scale: f32) -> Result<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CodecError::invalid_config(format!(
            "input scale must be finite and positive, got {}",
            scale
        )));
    }

    Ok(())
}
