//! LD-CELP command line tool
//!
//! Encodes raw little-endian 16-bit 8 kHz PCM into big-endian index words,
//! or decodes index words back to PCM.
//!
//! Usage:
//!   ldcelp encode speech.pcm speech.idx
//!   ldcelp decode speech.idx speech.pcm --postfilter

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ldcelp_core::codecs::ldcelp::tables::DEFAULT_INPUT_SCALE;
use ldcelp_core::codecs::ldcelp::{decode_stream, encode_stream, LdCelpDecoder, LdCelpEncoder, StreamStats};
use ldcelp_core::Result;

#[derive(Parser, Debug)]
#[command(name = "ldcelp", version, about = "16 kbit/s LD-CELP speech codec")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode raw PCM into index words
    Encode {
        /// Input PCM file (s16le, 8 kHz, mono)
        input: PathBuf,
        /// Output index file
        output: PathBuf,
        /// Scale applied to PCM before coding
        #[arg(long, default_value_t = DEFAULT_INPUT_SCALE)]
        scale: f32,
    },
    /// Decode index words into raw PCM
    Decode {
        /// Input index file
        input: PathBuf,
        /// Output PCM file (s16le, 8 kHz, mono)
        output: PathBuf,
        /// Run the adaptive postfilter
        #[arg(long)]
        postfilter: bool,
        /// Scale the encoder used
        #[arg(long, default_value_t = DEFAULT_INPUT_SCALE)]
        scale: f32,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn run(command: Command) -> Result<StreamStats> {
    match command {
        Command::Encode { input, output, scale } => {
            let mut encoder = LdCelpEncoder::with_scale(scale)?;
            let reader = BufReader::new(File::open(&input)?);
            let writer = BufWriter::new(File::create(&output)?);
            info!("encoding {} -> {}", input.display(), output.display());
            encode_stream(&mut encoder, reader, writer)
        }
        Command::Decode {
            input,
            output,
            postfilter,
            scale,
        } => {
            let mut decoder = LdCelpDecoder::with_scale(postfilter, scale)?;
            let reader = BufReader::new(File::open(&input)?);
            let writer = BufWriter::new(File::create(&output)?);
            info!(
                "decoding {} -> {} (postfilter {})",
                input.display(),
                output.display(),
                postfilter
            );
            decode_stream(&mut decoder, reader, writer)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(stats) => {
            println!(
                "{} vectors, {} bytes in, {} bytes out",
                stats.vectors, stats.bytes_read, stats.bytes_written
            );
            if stats.dropped_bytes > 0 {
                println!("dropped {} trailing bytes", stats.dropped_bytes);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("ldcelp: {}", e);
            ExitCode::FAILURE
        }
    }
}
