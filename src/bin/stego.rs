//! # Stego Binary Entry Point
//!
//! Thin command-line wrapper around the library.
//!
//! ## Usage
//!
//! ```bash
//! stego hide --input flarp.jpg --output output.png --message "Cody likes to make things."
//! stego reveal --input output.png
//! stego inspect --input flarp.jpg --json
//! ```
//!
//! The passphrase is read from `--passphrase` or `STEGO_PASSPHRASE`. Each
//! library error kind exits with its own non-zero status code.

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{error, LevelFilter};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use lsb_stego::common::config::{load_config, OutputFormat, StegoConfig};
use lsb_stego::{steganography, StegoError};

/// Command-line arguments for the stego binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace including bit patterns)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide an encrypted message in an image
    Hide {
        /// Carrier image (any format the image decoder reads)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the stego image
        #[arg(short, long)]
        output: PathBuf,

        /// Message text
        #[arg(short, long, conflicts_with = "message_file")]
        message: Option<String>,

        /// Read the message from a file instead
        #[arg(long)]
        message_file: Option<PathBuf>,

        #[arg(short, long, env = "STEGO_PASSPHRASE", hide_env_values = true)]
        passphrase: String,

        /// Output encoding, overrides the configuration file
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Recover the message hidden in an image
    Reveal {
        /// Stego image
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, env = "STEGO_PASSPHRASE", hide_env_values = true)]
        passphrase: String,
    },
    /// Show how large a message an image can carry
    Inspect {
        #[arg(short, long)]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<StegoError>()
                .map(StegoError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config: StegoConfig = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading config {}", path))?,
        None => StegoConfig::default(),
    };

    match args.command {
        Command::Hide {
            input,
            output,
            message,
            message_file,
            passphrase,
            format,
        } => {
            if let Some(format) = format {
                config.output.format = format;
            }
            let message = match (message, message_file) {
                (Some(message), _) => message,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading message from {}", path.display()))?,
                (None, None) => anyhow::bail!("either --message or --message-file is required"),
            };

            steganography::hide_file(&input, &output, &message, &passphrase, &config)?;
        }
        Command::Reveal { input, passphrase } => {
            let message = steganography::reveal_file(&input, &passphrase, &config)?;
            println!("{}", message);
        }
        Command::Inspect { input, json } => {
            let report = steganography::inspect_file(&input, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Image:           {}x{}", report.width, report.height);
                println!("Capacity:        {} bits", report.capacity_bits);
                println!("Payload space:   {} bits ({} bytes)", report.payload_bits, report.max_blob_bytes);
                match report.max_message_bytes {
                    Some(max) => println!("Longest message: {} bytes", max),
                    None => println!("Longest message: image too small for any message"),
                }
            }
        }
    }

    Ok(())
}
