//! G.728 Low-Delay CELP Codec Implementation
//!
//! 16 kbit/s speech coding of 8 kHz PCM, five samples at a time. Each vector
//! is coded as a single 10-bit codebook index; the synthesis filter, the
//! perceptual weighting filter and the excitation gain are all re-derived
//! from previously reconstructed signal, so encoder and decoder agree on
//! every coefficient without transmitting any of them.
//!
//! # Architecture
//!
//! - `tables`: codebooks, hybrid windows and tuning constants
//! - `ring`: circular sample histories
//! - `lpc`: hybrid-window autocorrelation, Levinson-Durbin, bandwidth expansion
//! - `adapter`: backward adapters, coefficient slots and the frame schedule
//! - `gain`: log-gain prediction
//! - `filter`: synthesis/weighting cascade memories
//! - `quantizer`: codebook search
//! - `synthesis`: reconstruction path shared by encoder and decoder
//! - `postfilter`: decoder-side pitch and spectral enhancement
//! - `encoder` / `decoder`: per-stream sessions
//! - `codec`: [`AudioCodec`](crate::types::AudioCodec) integration
//! - `pcm`, `stream`, `batch`: scaling, `std::io` streaming and parallel batches
//!
//! # Reference
//!
//! Modeled on ITU-T Recommendation G.728 (09/92). Interoperates with itself,
//! not bit-exactly with the ITU reference decoder.

pub mod adapter;
pub mod batch;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod filter;
pub mod gain;
pub mod lpc;
pub mod pcm;
pub mod postfilter;
pub mod quantizer;
pub mod ring;
pub mod stream;
pub mod synthesis;
pub mod tables;

#[cfg(test)]
mod tests;

// Re-export the main codec struct
pub use codec::LdCelpCodec;

// Re-export session types
pub use adapter::{scheduled_actions, AdaptAction, Phase};
pub use decoder::LdCelpDecoder;
pub use encoder::LdCelpEncoder;
pub use pcm::PcmScaler;
pub use quantizer::CodebookIndex;
pub use stream::{decode_stream, encode_stream, DecoderReader, StreamStats};
pub use synthesis::StreamState;
pub use tables::init_tables;
