//! lead-codec - command-line front end for the lead payload codec.
//!
//! Subcommands:
//! - demo: encode and decode a sample lead record, report round-trip and validity
//! - encode: JSON (argument or stdin) to base64
//! - decode: base64 (argument or stdin) to pretty JSON
//! - check: report whether base64 text holds a valid JSON payload

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lead_enrichment_core::{Codec, Config, Error, Result};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "lead-codec", about = "JSON <-> base64 payload codec", version)]
struct Cli {
    /// JSON config document; flags below override its values.
    #[arg(long, global = true, env = "LEAD_CODEC_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum container nesting accepted on encode and decode.
    #[arg(long, global = true, env = "LEAD_CODEC_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Maximum serialized JSON size in bytes. Unbounded when unset.
    #[arg(long, global = true, env = "LEAD_CODEC_MAX_PAYLOAD_BYTES")]
    max_payload_bytes: Option<usize>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Round-trip a sample lead record and print each step.
    Demo,
    /// Encode a JSON document.
    Encode {
        /// JSON text; read from stdin when omitted.
        json: Option<String>,
    },
    /// Decode base64 text into pretty-printed JSON.
    Decode {
        /// Encoded text; read from stdin when omitted.
        text: Option<String>,
    },
    /// Print `valid` or `invalid`; exit status 1 when invalid.
    Check {
        /// Encoded text; read from stdin when omitted.
        text: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        if let Some(max_depth) = self.max_depth {
            config.codec.max_depth = max_depth;
        }
        if self.max_payload_bytes.is_some() {
            config.codec.max_payload_bytes = self.max_payload_bytes;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when `check` finds the input invalid.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = cli.config()?;
    lead_enrichment_core::observability::init_tracing(&config.observability);

    let codec = Codec::new(config.codec)?;
    tracing::debug!(?config, "lead-codec starting");

    match cli.command {
        Commands::Demo => demo(&codec).map(|()| true),
        Commands::Encode { json } => {
            let text = arg_or_stdin(json)?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| Error::invalid_input(format!("input is not JSON: {e}")))?;
            println!("{}", codec.encode_value(&value)?);
            Ok(true)
        }
        Commands::Decode { text } => {
            let text = arg_or_stdin(text)?;
            let value = codec.decode(text.trim())?;
            println!("{}", pretty(&value)?);
            Ok(true)
        }
        Commands::Check { text } => {
            let text = arg_or_stdin(text)?;
            let valid = codec.is_valid(text.trim());
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(valid)
        }
    }
}

fn demo(codec: &Codec) -> Result<()> {
    let sample = json!({
        "name": "John Doe",
        "age": 30,
        "city": "New York",
        "hobbies": ["reading", "coding", "traveling"],
        "is_active": true,
        "metadata": {
            "created_at": "2024-01-01",
            "updated_at": "2024-01-15"
        }
    });

    println!("Original JSON data:");
    println!("{}", pretty(&sample)?);
    println!();

    let encoded = codec.encode_value(&sample)?;
    println!("Base64 encoded: {encoded}");
    println!();

    let decoded = codec.decode(&encoded)?;
    println!("Decoded JSON data:");
    println!("{}", pretty(&decoded)?);
    println!();

    println!("Round-trip conversion successful: {}", sample == decoded);
    println!("Valid base64 JSON: {}", codec.is_valid(&encoded));
    println!(
        "Invalid base64 JSON: {}",
        codec.is_valid("invalid_base64")
    );
    Ok(())
}

fn arg_or_stdin(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::unserializable(e.to_string()))
}
