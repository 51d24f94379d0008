//! Streaming I/O
//!
//! Raw PCM is little-endian 16-bit; index streams are big-endian 16-bit
//! words with no header. The codec itself performs no I/O, these helpers
//! drive an encoder or decoder session from `std::io` sources and sinks.

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

use super::decoder::{LdCelpDecoder, INDEX_BYTES};
use super::encoder::LdCelpEncoder;
use super::tables::IDIM;
use crate::error::Result;

/// Bytes of PCM per vector
const PCM_VECTOR_BYTES: usize = IDIM * 2;

/// Vectors handled per read
const BLOCK_VECTORS: usize = 64;

/// Totals for one streamed session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Vectors coded
    pub vectors: u64,
    /// Bytes read from the source
    pub bytes_read: u64,
    /// Bytes written to the sink
    pub bytes_written: u64,
    /// Trailing input bytes that did not form a whole vector
    pub dropped_bytes: usize,
}

/// Read until `buf` is full or the source is exhausted
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Encode little-endian PCM from `input` into index words on `output`
///
/// A trailing partial vector is dropped and counted in
/// [`StreamStats::dropped_bytes`]. The encoder session is finished on return.
pub fn encode_stream<R: Read, W: Write>(
    encoder: &mut LdCelpEncoder,
    mut input: R,
    mut output: W,
) -> Result<StreamStats> {
    let mut stats = StreamStats::default();
    let mut block = vec![0u8; PCM_VECTOR_BYTES * BLOCK_VECTORS];
    let mut words = BytesMut::with_capacity(INDEX_BYTES * BLOCK_VECTORS);

    loop {
        let filled = read_full(&mut input, &mut block)?;
        stats.bytes_read += filled as u64;
        let whole = filled - filled % PCM_VECTOR_BYTES;

        words.clear();
        for mut chunk in block[..whole].chunks_exact(PCM_VECTOR_BYTES) {
            let pcm: [i16; IDIM] = std::array::from_fn(|_| chunk.get_i16_le());
            let index = encoder.encode_vector(&pcm)?;
            words.put_u16(u16::from(index));
            stats.vectors += 1;
        }
        output.write_all(&words)?;
        stats.bytes_written += words.len() as u64;

        if filled < block.len() {
            stats.dropped_bytes = filled - whole;
            break;
        }
    }

    output.flush()?;
    encoder.finish();
    debug!(
        "encoded stream: {} vectors, {} trailing bytes dropped",
        stats.vectors, stats.dropped_bytes
    );
    Ok(stats)
}

/// Decode index words from `input` into little-endian PCM on `output`
///
/// Everything decoded before a bad index or a trailing odd byte is written
/// before the error is reported. The decoder session is finished on return.
pub fn decode_stream<R: Read, W: Write>(
    decoder: &mut LdCelpDecoder,
    mut input: R,
    mut output: W,
) -> Result<StreamStats> {
    let mut stats = StreamStats::default();
    let mut block = vec![0u8; INDEX_BYTES * BLOCK_VECTORS];
    let mut pcm = Vec::with_capacity(IDIM * BLOCK_VECTORS);
    let mut pcm_bytes = BytesMut::with_capacity(PCM_VECTOR_BYTES * BLOCK_VECTORS);

    loop {
        let filled = read_full(&mut input, &mut block)?;
        stats.bytes_read += filled as u64;

        pcm.clear();
        let decoded = decoder.decode_bytes_into(&block[..filled], &mut pcm);
        pcm_bytes.clear();
        for &sample in &pcm {
            pcm_bytes.put_i16_le(sample);
        }
        stats.vectors += (pcm.len() / IDIM) as u64;
        output.write_all(&pcm_bytes)?;
        stats.bytes_written += pcm_bytes.len() as u64;

        if let Err(error) = decoded {
            output.flush()?;
            return Err(error);
        }
        if filled < block.len() {
            break;
        }
    }

    output.flush()?;
    decoder.finish();
    debug!("decoded stream: {} vectors", stats.vectors);
    Ok(stats)
}

/// `Read` adapter producing little-endian PCM from an index source
///
/// Index words are pulled and decoded lazily as the caller reads. A decode
/// failure is returned once every sample decoded before it has been read.
pub struct DecoderReader<R> {
    decoder: LdCelpDecoder,
    source: R,
    pending: BytesMut,
    words: Vec<u8>,
    samples: Vec<i16>,
    failure: Option<io::Error>,
    exhausted: bool,
}

impl<R: Read> DecoderReader<R> {
    /// Wrap an index source
    pub fn new(decoder: LdCelpDecoder, source: R) -> Self {
        Self {
            decoder,
            source,
            pending: BytesMut::new(),
            words: vec![0; INDEX_BYTES * BLOCK_VECTORS],
            samples: Vec::with_capacity(IDIM * BLOCK_VECTORS),
            failure: None,
            exhausted: false,
        }
    }

    /// Decoder session
    pub fn decoder(&self) -> &LdCelpDecoder {
        &self.decoder
    }

    /// Release the decoder and source
    pub fn into_inner(self) -> (LdCelpDecoder, R) {
        (self.decoder, self.source)
    }

    fn refill(&mut self) -> io::Result<()> {
        let filled = read_full(&mut self.source, &mut self.words)?;
        if filled < self.words.len() {
            self.exhausted = true;
        }

        self.samples.clear();
        let decoded = self
            .decoder
            .decode_bytes_into(&self.words[..filled], &mut self.samples);
        for &sample in &self.samples {
            self.pending.put_i16_le(sample);
        }

        match decoded {
            Err(e) => {
                self.exhausted = true;
                self.failure = Some(io::Error::new(io::ErrorKind::InvalidData, e));
            }
            Ok(()) if self.exhausted => self.decoder.finish(),
            Ok(()) => {}
        }
        Ok(())
    }
}

impl<R: Read> Read for DecoderReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pending.is_empty() && !self.exhausted {
            self.refill()?;
        }
        if self.pending.is_empty() {
            if let Some(failure) = self.failure.take() {
                return Err(failure);
            }
        }
        let n = buf.len().min(self.pending.len());
        self.pending.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}
