//! Callwire CLI Application
//!
//! Decodes, validates and generates signaling payloads for debugging peers.

use anyhow::Result;
use callwire_core::prelude::*;
use callwire_core::DEFAULT_MAX_PAYLOAD_SIZE;
use clap::{Parser, Subcommand};
use inspect::CliMessageKind;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod inspect;
#[cfg(test)]
mod inspect_tests;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Largest payload accepted, in bytes
    #[arg(long, env = "CALLWIRE_MAX_PAYLOAD_SIZE", default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    max_payload_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload and print its canonical form
    Decode {
        /// Payload file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },

    /// Check that a payload parses
    Validate {
        /// Payload file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },

    /// Print a sample payload
    Sample {
        /// Message kind
        #[arg(value_enum)]
        kind: CliMessageKind,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let default_filter = if cli.verbose {
        "callwire=debug"
    } else {
        "callwire=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let codec = SignalingCodec::new(
        CodecConfig::default().with_max_payload_size(cli.max_payload_size),
    );

    match cli.command {
        Commands::Decode { file } => handle_decode(&codec, file.as_deref())?,
        Commands::Validate { file } => handle_validate(&codec, file.as_deref())?,
        Commands::Sample { kind } => handle_sample(kind)?,
    }

    Ok(())
}

fn handle_decode(codec: &SignalingCodec, file: Option<&Path>) -> Result<()> {
    let payload = inspect::read_payload(file)?;
    let report = inspect::decode_report(codec, &payload)?;
    println!("{report}");
    Ok(())
}

fn handle_validate(codec: &SignalingCodec, file: Option<&Path>) -> Result<()> {
    let payload = inspect::read_payload(file)?;
    let kind = inspect::validate(codec, &payload)?;
    println!("ok: {kind}");
    Ok(())
}

fn handle_sample(kind: CliMessageKind) -> Result<()> {
    let message = inspect::sample_message(kind.into());
    println!("{}", inspect::pretty(&message)?);
    Ok(())
}
