//! Codec implementations and factory

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, CodecConfig, CodecInfo, CodecType};
use std::collections::HashMap;

// Codec implementations
pub mod ldcelp;

/// Codec factory for creating codec instances
pub struct CodecFactory;

impl CodecFactory {
    /// Create a codec instance from configuration
    pub fn create(config: CodecConfig) -> Result<Box<dyn AudioCodec>> {
        // Validate configuration first
        config.validate()?;

        match config.codec_type {
            CodecType::G728 => {
                let codec = ldcelp::LdCelpCodec::new(config)?;
                Ok(Box::new(codec))
            }
        }
    }

    /// Create a codec by name
    pub fn create_by_name(name: &str, config: CodecConfig) -> Result<Box<dyn AudioCodec>> {
        let codec_type =
            CodecType::from_name(name).ok_or_else(|| CodecError::unsupported_codec(name))?;

        let config = CodecConfig {
            codec_type,
            ..config
        };

        Self::create(config)
    }

    /// Create a codec by RTP payload type
    pub fn create_by_payload_type(
        payload_type: u8,
        config: CodecConfig,
    ) -> Result<Box<dyn AudioCodec>> {
        let codec_type = CodecType::ALL
            .iter()
            .copied()
            .find(|codec| codec.payload_type() == Some(payload_type))
            .ok_or_else(|| CodecError::unsupported_codec(format!("PT{}", payload_type)))?;

        let config = CodecConfig {
            codec_type,
            ..config
        };

        Self::create(config)
    }

    /// Get all supported codec names
    pub fn supported_codecs() -> Vec<&'static str> {
        CodecType::ALL.iter().map(|codec| codec.name()).collect()
    }

    /// Check if a codec is supported
    pub fn is_supported(name: &str) -> bool {
        CodecType::from_name(name).is_some()
    }

    /// Static information for a codec type with default settings
    pub fn info(codec_type: CodecType) -> CodecInfo {
        CodecInfo {
            name: codec_type.name(),
            sample_rate: codec_type.default_sample_rate(),
            channels: 1,
            bitrate: codec_type.default_bitrate(),
            frame_size: codec_type.vector_size(),
            payload_type: codec_type.payload_type(),
        }
    }
}

/// Codec registry for managing multiple codec instances
pub struct CodecRegistry {
    codecs: HashMap<String, Box<dyn AudioCodec>>,
}

impl CodecRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register a codec with a name
    pub fn register(&mut self, name: String, codec: Box<dyn AudioCodec>) {
        self.codecs.insert(name, codec);
    }

    /// Get a codec by name
    pub fn get(&self, name: &str) -> Option<&dyn AudioCodec> {
        self.codecs.get(name).map(|codec| codec.as_ref())
    }

    /// Get a mutable codec by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn AudioCodec>> {
        self.codecs.get_mut(name)
    }

    /// Remove a codec by name
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn AudioCodec>> {
        self.codecs.remove(name)
    }

    /// List all registered codec names
    pub fn list_codecs(&self) -> Vec<&String> {
        self.codecs.keys().collect()
    }

    /// Get the count of registered codecs
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Clear all registered codecs
    pub fn clear(&mut self) {
        self.codecs.clear();
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
