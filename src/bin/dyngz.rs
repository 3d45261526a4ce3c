use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use dyngz::gzip::GzipHeader;
use dyngz::{
    verify_gzip, ClEncoding, EncodeConfig, EncodeStats, Encoder, Error, LengthStrategy,
    ParallelEncoder, SingleThreadedEncoder, DEFAULT_BLOCK_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "dyngz")]
#[command(about = "Compress to gzip using DEFLATE dynamic Huffman blocks")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output gzip file (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Maximum uncompressed bytes per DEFLATE block
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Fit Huffman code lengths to each block instead of the fixed 8/9-bit tables
    #[arg(long)]
    adaptive: bool,

    /// Run-length encode the code-length tables in block headers
    #[arg(long)]
    rle: bool,

    /// Store the input file name in the gzip header
    #[arg(long)]
    name: bool,

    /// Decode the result with libdeflate and compare before writing it
    #[arg(long)]
    verify: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_OK: u8 = 0;
const EXIT_VERIFY_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = match e {
                Error::VerifyFailed(_)
                | Error::SizeMismatch { .. }
                | Error::ContentMismatch { .. } => EXIT_VERIFY_FAILED,
                _ => EXIT_ERROR,
            };
            ExitCode::from(code)
        }
    }
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let is_stdin = args.input.to_str() == Some("-");
    let is_stdout = args.output.to_str() == Some("-");

    let header = GzipHeader {
        filename: if args.name && !is_stdin { file_name(&args.input) } else { None },
        ..Default::default()
    };

    let config = EncodeConfig {
        block_size: args.block_size,
        length_strategy: if args.adaptive {
            LengthStrategy::Adaptive
        } else {
            LengthStrategy::Placeholder
        },
        cl_encoding: if args.rle { ClEncoding::RunLength } else { ClEncoding::Direct },
        num_threads: args.threads,
        header,
        ..Default::default()
    };
    config.validate()?;

    let input: Box<dyn Read> = if is_stdin {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let output: Box<dyn Write> = if is_stdout {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(&args.output)?))
    };

    let start = Instant::now();

    let stats = if args.verify {
        encode_verified(&config, input, output, args.verbose)?
    } else {
        encode_with(&config, input, output)?
    };

    let elapsed = start.elapsed();

    if args.verbose {
        eprintln!("Encoding complete:");
        eprintln!("  Input bytes:      {}", stats.input_bytes);
        eprintln!("  Output bytes:     {}", stats.output_bytes);
        eprintln!("  DEFLATE blocks:   {}", stats.blocks_written);
        eprintln!("  CRC-32:           {:08x}", stats.crc32);
        eprintln!("  Time:             {:.2?}", elapsed);
        eprintln!(
            "  Throughput:       {:.1} MB/s",
            stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }

    Ok(())
}

fn encode_with<R: Read, W: Write>(
    config: &EncodeConfig,
    input: R,
    output: W,
) -> Result<EncodeStats, Error> {
    if config.num_threads == 1 {
        SingleThreadedEncoder::new(config.clone()).encode(input, output)
    } else {
        ParallelEncoder::new(config.clone()).encode(input, output)
    }
}

/// Buffer the whole input so the encoded result can be checked before any of it is written
fn encode_verified<R: Read, W: Write>(
    config: &EncodeConfig,
    mut input: R,
    mut output: W,
    verbose: bool,
) -> Result<EncodeStats, Error> {
    let mut original = Vec::new();
    input.read_to_end(&mut original)?;

    let mut compressed = Vec::new();
    let stats = encode_with(config, original.as_slice(), &mut compressed)?;

    verify_gzip(&compressed, &original)?;
    if verbose {
        eprintln!("Verified {} bytes with libdeflate", original.len());
    }

    output.write_all(&compressed)?;
    output.flush()?;
    Ok(stats)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().into_owned())
}
