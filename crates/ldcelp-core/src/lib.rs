//! # LDCELP-Core: Low-Delay CELP Speech Codec
//!
//! This library implements a 16 kbit/s backward-adaptive speech codec modeled
//! on ITU-T G.728. Each 5-sample vector of 8 kHz speech is coded as one
//! 10-bit codebook index; every filter and gain coefficient is re-derived
//! from already reconstructed signal on both sides, so nothing but the
//! indices is ever transmitted.
//!
//! ## Features
//!
//! - **Low delay**: one 5-sample vector (0.625 ms) of algorithmic delay
//! - **Backward adaptation**: order-50 synthesis filter, order-10 perceptual
//!   weighting and log-gain prediction, recomputed every 20 samples
//! - **Postfilter**: optional decoder-side pitch and spectral enhancement
//! - **Streaming**: `std::io` helpers and a `Read` adapter for index streams
//! - **Parallel Processing**: independent streams spread over a rayon pool
//!
//! ## Usage
//!
//! ```rust
//! use ldcelp_core::{AudioCodec, CodecConfig, CodecFactory};
//!
//! // Create a G.728 codec with the postfilter enabled
//! let config = CodecConfig::g728().with_postfilter(true);
//! let mut codec = CodecFactory::create(config)?;
//!
//! // Encode audio samples
//! let samples = vec![0i16; 160]; // 20ms at 8kHz
//! let encoded = codec.encode(&samples)?;
//! assert_eq!(encoded.len(), 64);
//!
//! // Decode back to samples
//! let decoded = codec.decode(&encoded)?;
//! assert_eq!(decoded.len(), 160);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codecs;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use codecs::ldcelp::{CodebookIndex, LdCelpCodec, LdCelpDecoder, LdCelpEncoder, StreamState};
pub use codecs::{CodecFactory, CodecRegistry};
pub use error::{CodecError, Result};
pub use types::{AudioCodec, AudioCodecExt, CodecConfig, CodecInfo, CodecType, SampleRate};

/// Version information for the codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported codec types
pub const SUPPORTED_CODECS: &[&str] = &["G728"];

/// Initialize the codec library
///
/// This function should be called once at program startup to initialize
/// the lookup tables. It's safe to call multiple times.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for fallible setup.
pub fn init() -> Result<()> {
    // Initialize logging if not already done
    let _ = tracing_subscriber::fmt::try_init();

    // Initialize lookup tables
    codecs::ldcelp::init_tables();

    tracing::info!("LDCELP-Core v{} initialized", VERSION);
    tracing::info!("Supported codecs: {:?}", SUPPORTED_CODECS);

    Ok(())
}

/// Get library information
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        supported_codecs: SUPPORTED_CODECS.to_vec(),
        rayon_threads: rayon::current_num_threads(),
    }
}

/// Library information structure
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Library version
    pub version: &'static str,
    /// List of supported codec names
    pub supported_codecs: Vec<&'static str>,
    /// Worker threads available to batch processing
    pub rayon_threads: usize,
}
