//! Codec traits, identifiers and configuration

use crate::codecs::ldcelp::tables::{DEFAULT_INPUT_SCALE, IDIM};
use crate::error::{CodecError, Result};
use crate::utils::validation::{validate_channels, validate_sample_rate, validate_scale};
use std::fmt;

/// Block-oriented audio codec
///
/// Implementations keep per-stream state between calls; `reset` returns
/// them to the state of a freshly created codec.
pub trait AudioCodec: Send + Sync {
    /// Encode 16-bit PCM into the codec's wire format
    ///
    /// # Errors
    ///
    /// Fails if the input does not fit the codec's framing or the session
    /// can no longer accept input.
    fn encode(&mut self, samples: &[i16]) -> Result<Vec<u8>>;

    /// Decode wire data back into 16-bit PCM
    ///
    /// # Errors
    ///
    /// Fails on malformed data; for stateful codecs this may end the
    /// session.
    fn decode(&mut self, data: &[u8]) -> Result<Vec<i16>>;

    /// Static description of this codec instance
    fn info(&self) -> CodecInfo;

    /// Discard all stream state
    fn reset(&mut self) -> Result<()>;

    /// Preferred number of samples per `encode` call
    fn frame_size(&self) -> usize;

    /// Whether `encode` accepts lengths other than [`AudioCodec::frame_size`]
    fn supports_variable_frame_size(&self) -> bool {
        false
    }
}

/// Zero-allocation variants of the [`AudioCodec`] operations
pub trait AudioCodecExt: AudioCodec {
    /// Encode into `output`, returning the bytes written
    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize>;

    /// Decode into `output`, returning the samples written
    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> Result<usize>;

    /// Upper bound on encoded bytes for `input_samples` samples
    fn max_encoded_size(&self, input_samples: usize) -> usize;

    /// Upper bound on decoded samples for `input_bytes` bytes
    fn max_decoded_size(&self, input_bytes: usize) -> usize;
}

/// Audio codec information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecInfo {
    /// Codec name (e.g., "G728")
    pub name: &'static str,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u8,
    /// Bitrate in bits per second
    pub bitrate: u32,
    /// Frame size in samples
    pub frame_size: usize,
    /// RTP payload type (if standard)
    pub payload_type: Option<u8>,
}

/// Audio codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// G.728 low-delay CELP, 16 kbit/s
    G728,
}

impl CodecType {
    /// Every supported codec type
    pub const ALL: &'static [Self] = &[Self::G728];

    /// Get the codec name
    pub fn name(self) -> &'static str {
        match self {
            Self::G728 => "G728",
        }
    }

    /// Look up a codec type by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|codec| codec.name().eq_ignore_ascii_case(name))
    }

    /// Get the default sample rate
    pub fn default_sample_rate(self) -> u32 {
        match self {
            Self::G728 => 8000,
        }
    }

    /// Get the default bitrate
    pub fn default_bitrate(self) -> u32 {
        match self {
            Self::G728 => 16000,
        }
    }

    /// Get the standard RTP payload type
    pub fn payload_type(self) -> Option<u8> {
        match self {
            Self::G728 => Some(15),
        }
    }

    /// Get supported sample rates
    pub fn supported_sample_rates(self) -> &'static [u32] {
        match self {
            Self::G728 => &[8000],
        }
    }

    /// Get supported channel counts
    pub fn supported_channels(self) -> &'static [u8] {
        match self {
            Self::G728 => &[1],
        }
    }

    /// Samples consumed per coded unit
    pub fn vector_size(self) -> usize {
        match self {
            Self::G728 => IDIM,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sample rate enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    /// 8 kHz (narrowband)
    Rate8000,
    /// 16 kHz (wideband)
    Rate16000,
    /// 48 kHz (professional)
    Rate48000,
    /// Custom sample rate
    Custom(u32),
}

impl SampleRate {
    /// Get the sample rate value in Hz
    pub fn hz(self) -> u32 {
        match self {
            Self::Rate8000 => 8000,
            Self::Rate16000 => 16000,
            Self::Rate48000 => 48000,
            Self::Custom(rate) => rate,
        }
    }

    /// Create from Hz value
    pub fn from_hz(hz: u32) -> Self {
        match hz {
            8000 => Self::Rate8000,
            16000 => Self::Rate16000,
            48000 => Self::Rate48000,
            rate => Self::Custom(rate),
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.hz())
    }
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    /// Codec type
    pub codec_type: CodecType,
    /// Sample rate
    pub sample_rate: SampleRate,
    /// Number of channels
    pub channels: u8,
    /// Frame size in milliseconds
    pub frame_size_ms: Option<f32>,
    /// Codec-specific parameters
    pub parameters: CodecParameters,
}

impl CodecConfig {
    /// Create a new codec configuration
    pub fn new(codec_type: CodecType) -> Self {
        Self {
            codec_type,
            sample_rate: SampleRate::from_hz(codec_type.default_sample_rate()),
            channels: 1,
            frame_size_ms: None,
            parameters: CodecParameters::default(),
        }
    }

    /// Create G.728 configuration
    pub fn g728() -> Self {
        Self::new(CodecType::G728)
    }

    /// Set sample rate
    pub fn with_sample_rate(mut self, sample_rate: SampleRate) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set channel count
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    /// Set frame size in milliseconds
    pub fn with_frame_size_ms(mut self, frame_size_ms: f32) -> Self {
        self.frame_size_ms = Some(frame_size_ms);
        self
    }

    /// Set codec parameters
    pub fn with_parameters(mut self, parameters: CodecParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Enable or disable the decoder postfilter
    pub fn with_postfilter(mut self, postfilter: bool) -> Self {
        self.parameters.ldcelp.postfilter = postfilter;
        self
    }

    /// Set the PCM input scale
    pub fn with_input_scale(mut self, input_scale: f32) -> Self {
        self.parameters.ldcelp.input_scale = input_scale;
        self
    }

    /// Frame size in samples, defaulting to one vector
    pub fn frame_size_samples(&self) -> usize {
        match self.frame_size_ms {
            Some(ms) => (ms * self.sample_rate.hz() as f32 / 1000.0).round() as usize,
            None => self.codec_type.vector_size(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.codec_type, self.sample_rate)?;
        validate_channels(self.codec_type, self.channels)?;

        // Frames must hold whole vectors
        if let Some(ms) = self.frame_size_ms {
            let samples = ms * self.sample_rate.hz() as f32 / 1000.0;
            let vector = self.codec_type.vector_size();
            let whole = samples.is_finite() && samples.fract() == 0.0;
            if !whole || samples < vector as f32 || samples as usize % vector != 0 {
                return Err(CodecError::invalid_config(format!(
                    "frame size {}ms is not a whole number of {}-sample vectors",
                    ms, vector
                )));
            }
        }

        validate_scale(self.parameters.ldcelp.input_scale)
    }
}

/// Codec-specific parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodecParameters {
    /// G.728 specific parameters
    pub ldcelp: LdCelpParameters,
}

/// G.728 codec parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LdCelpParameters {
    /// Run the adaptive postfilter on decoded speech
    pub postfilter: bool,
    /// Factor applied to PCM before encoding, inverted after decoding
    pub input_scale: f32,
}

impl Default for LdCelpParameters {
    fn default() -> Self {
        Self {
            postfilter: false,
            input_scale: DEFAULT_INPUT_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_type_properties() {
        assert_eq!(CodecType::G728.name(), "G728");
        assert_eq!(CodecType::G728.default_sample_rate(), 8000);
        assert_eq!(CodecType::G728.default_bitrate(), 16000);
        assert_eq!(CodecType::G728.payload_type(), Some(15));
        assert_eq!(CodecType::from_name("g728"), Some(CodecType::G728));
        assert_eq!(CodecType::from_name("PCMU"), None);
    }

    #[test]
    fn test_sample_rate_conversion() {
        assert_eq!(SampleRate::Rate8000.hz(), 8000);
        assert_eq!(SampleRate::from_hz(8000), SampleRate::Rate8000);
        assert_eq!(SampleRate::from_hz(22050), SampleRate::Custom(22050));
    }

    #[test]
    fn test_codec_config_validation() {
        let config = CodecConfig::g728();
        assert!(config.validate().is_ok());
        assert_eq!(config.parameters.ldcelp.input_scale, 0.125);
        assert!(!config.parameters.ldcelp.postfilter);

        let invalid = CodecConfig::g728().with_sample_rate(SampleRate::Rate48000);
        assert!(matches!(
            invalid.validate(),
            Err(CodecError::InvalidSampleRate { rate: 48000, .. })
        ));

        let stereo = CodecConfig::g728().with_channels(2);
        assert!(matches!(
            stereo.validate(),
            Err(CodecError::InvalidChannelCount { channels: 2, .. })
        ));

        assert!(CodecConfig::g728().with_input_scale(0.0).validate().is_err());
    }

    #[test]
    fn test_frame_size_must_hold_whole_vectors() {
        let config = CodecConfig::g728().with_frame_size_ms(2.5);
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_size_samples(), 20);

        assert!(CodecConfig::g728().with_frame_size_ms(20.0).validate().is_ok());
        assert!(CodecConfig::g728().with_frame_size_ms(0.5).validate().is_err());
        assert!(CodecConfig::g728().with_frame_size_ms(1.0).validate().is_err());
        assert_eq!(CodecConfig::g728().frame_size_samples(), IDIM);
    }
}
