//! Command-line front-end.
//!
//! Wraps the hybrid frame in a small container so decompression can restore
//! the original filename:
//!
//! ```text
//! +-------+---------+-----------+----------+--------------+
//! | magic | version | name_len  | basename | hybrid frame |
//! | "PP"  | 1 byte  | u16 LE    | variable | variable     |
//! +-------+---------+-----------+----------+--------------+
//! ```
//!
//! Files without the magic/version are treated as legacy headerless frames.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

const MAGIC: [u8; 2] = *b"PP";
const FORMAT_VERSION: u8 = 2;
const DEFAULT_EXT: &str = "ppz";

#[derive(Parser)]
#[command(
    name = "polypress",
    version,
    about = "Compression utility with adaptive algorithm selection",
    long_about = "Compresses files by trying PPM, LZ, BWT and context-mixing pipelines\nand keeping whichever yields the smallest output.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Compress this file to <FILE>.ppz (shorthand for `compress`).
    file: Option<PathBuf>,

    /// Suppress the summary report.
    #[arg(short = 's', long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file.
    #[command(visible_alias = "c")]
    Compress {
        input: PathBuf,
        /// Output path (defaults to <INPUT>.ppz).
        output: Option<PathBuf>,
    },
    /// Decompress a file.
    #[command(visible_alias = "d")]
    Decompress {
        input: PathBuf,
        /// Output path (defaults to the name stored in the container).
        output: Option<PathBuf>,
    },
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn add_header(frame: &[u8], original_name: &str) -> Vec<u8> {
    let mut name = original_name.as_bytes();
    if name.len() > u16::MAX as usize {
        name = &name[..u16::MAX as usize];
    }

    let mut out = Vec::with_capacity(5 + name.len() + frame.len());
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(frame);
    out
}

/// Split a container into (stored name, frame). Headerless data comes back
/// with an empty name and the whole input as the frame.
fn parse_header(data: &[u8]) -> (String, &[u8]) {
    if data.len() < 5 || data[0..2] != MAGIC || data[2] != FORMAT_VERSION {
        return (String::new(), data);
    }
    let name_len = u16::from_le_bytes([data[3], data[4]]) as usize;
    if data.len() < 5 + name_len {
        return (String::new(), data);
    }
    let name = String::from_utf8_lossy(&data[5..5 + name_len]).into_owned();
    (name, &data[5 + name_len..])
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1 << 20 {
        format!("{:.1} MiB", bytes as f64 / (1 << 20) as f64)
    } else if bytes >= 1 << 10 {
        format!("{:.1} KiB", bytes as f64 / (1 << 10) as f64)
    } else {
        format!("{bytes} B")
    }
}

fn do_compress(input_path: &Path, output_path: &Path, silent: bool) -> std::io::Result<()> {
    let start = Instant::now();
    let input = std::fs::read(input_path)?;

    let frame = polypress::compress(&input);
    let out = add_header(&frame, &basename(input_path));

    std::fs::write(output_path, &out)?;

    if !silent {
        let ratio = if input.is_empty() {
            0.0
        } else {
            100.0 * out.len() as f64 / input.len() as f64
        };
        eprintln!("{} -> {}", format_size(input.len()), format_size(out.len()));
        eprintln!(
            "Ratio: {:.1}% | Time: {:.2}s",
            ratio,
            start.elapsed().as_secs_f64()
        );
        eprintln!("Output: {}", output_path.display());
    }

    Ok(())
}

fn do_decompress(
    input_path: &Path,
    explicit_output: Option<PathBuf>,
    silent: bool,
) -> std::io::Result<()> {
    let start = Instant::now();
    let input = std::fs::read(input_path)?;

    let (stored_name, frame) = parse_header(&input);
    let output_path = explicit_output.unwrap_or_else(|| {
        if !stored_name.is_empty() {
            PathBuf::from(stored_name)
        } else if input_path.extension().is_some_and(|e| e == DEFAULT_EXT) {
            input_path.with_extension("")
        } else {
            let mut p = input_path.as_os_str().to_owned();
            p.push(".out");
            PathBuf::from(p)
        }
    });

    let out = polypress::decompress(frame);
    std::fs::write(&output_path, &out)?;

    if !silent {
        eprintln!("{} -> {}", format_size(input.len()), format_size(out.len()));
        eprintln!("Time: {:.2}s", start.elapsed().as_secs_f64());
        eprintln!("Output: {}", output_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Compress { input, output }) => {
            let output = output.unwrap_or_else(|| {
                let mut p = input.as_os_str().to_owned();
                p.push(".");
                p.push(DEFAULT_EXT);
                PathBuf::from(p)
            });
            do_compress(&input, &output, cli.silent)
        }
        Some(Command::Decompress { input, output }) => {
            do_decompress(&input, output, cli.silent)
        }
        None => match cli.file {
            Some(input) => {
                let mut p = input.as_os_str().to_owned();
                p.push(".");
                p.push(DEFAULT_EXT);
                let output = PathBuf::from(p);
                do_compress(&input, &output, cli.silent)
            }
            None => {
                eprintln!("error: no input file (see --help)");
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let framed = add_header(b"payload", "notes.txt");
        let (name, frame) = parse_header(&framed);
        assert_eq!(name, "notes.txt");
        assert_eq!(frame, b"payload");
    }

    #[test]
    fn test_legacy_data_passes_through() {
        let raw = [0xFFu8, 1, 2, 3];
        let (name, frame) = parse_header(&raw);
        assert!(name.is_empty());
        assert_eq!(frame, raw);
    }

    #[test]
    fn test_wrong_version_is_legacy() {
        let mut framed = add_header(b"x", "a");
        framed[2] = 9;
        let (name, frame) = parse_header(&framed);
        assert!(name.is_empty());
        assert_eq!(frame, framed.as_slice());
    }
}
