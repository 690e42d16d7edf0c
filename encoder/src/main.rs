//! Runtime State Record reference encoder.
//!
//! `emit` prints a record derived from four function values; `validate` checks
//! candidate records from stdin (or a file) against the twelve invariants.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pmatrix_encoder::core::profile::Profile;
use pmatrix_encoder::core::record::Functions;
use pmatrix_encoder::emit::{emit, render_record};
use pmatrix_encoder::exit_codes;
use pmatrix_encoder::io::clock::{FixedClock, SystemClock};
use pmatrix_encoder::io::input::read_input;
use pmatrix_encoder::io::schema::V1_SCHEMA;
use pmatrix_encoder::logging;
use pmatrix_encoder::report::render_text;
use pmatrix_encoder::validate::{ValidateOptions, validate_text};

#[derive(Parser)]
#[command(
    name = "pmatrix-encoder",
    version,
    about = "Runtime State Record reference encoder and validator (demonstration scoring only)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emit one record from four function values.
    Emit {
        #[arg(long, allow_negative_numbers = true, value_parser = finite_f64)]
        baseline: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_f64)]
        norm: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_f64)]
        stability: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_f64)]
        meta_control: f64,
        /// Unix timestamp in seconds (defaults to the current time).
        #[arg(long)]
        timestamp: Option<u64>,
        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Check candidate records against the twelve invariants.
    Validate {
        /// Read candidates from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Timestamps of earlier records in the stream (repeatable or comma-separated).
        #[arg(long = "prior", value_delimiter = ',')]
        prior: Vec<u64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Also report advisory JSON Schema diagnostics.
        #[arg(long)]
        schema: bool,
    },
    /// Print the record's JSON Schema.
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let profile = Profile::reference();
    match cli.command {
        Command::Emit {
            baseline,
            norm,
            stability,
            meta_control,
            timestamp,
            compact,
        } => {
            let functions = Functions {
                baseline,
                norm,
                stability,
                meta_control,
            };
            cmd_emit(functions, timestamp, compact, &profile)
        }
        Command::Validate {
            input,
            prior,
            format,
            schema,
        } => {
            let options = ValidateOptions {
                prior_timestamps: prior,
                check_schema: schema,
            };
            cmd_validate(input, &options, format, &profile)
        }
        Command::Schema => {
            print!("{}", V1_SCHEMA);
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_emit(
    functions: Functions,
    timestamp: Option<u64>,
    compact: bool,
    profile: &Profile,
) -> Result<i32> {
    let record = match timestamp {
        Some(ts) => emit(functions, &FixedClock(ts), profile),
        None => emit(functions, &SystemClock, profile),
    };
    println!("{}", render_record(&record, compact)?);
    Ok(exit_codes::OK)
}

fn cmd_validate(
    input: Option<PathBuf>,
    options: &ValidateOptions,
    format: Format,
    profile: &Profile,
) -> Result<i32> {
    let text = read_input(input.as_deref())?;
    let outcome = validate_text(&text, options, profile)?;
    match format {
        Format::Text => print!("{}", render_text(&outcome)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("serialize report")?
        ),
    }
    if outcome.is_conforming() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::NONCONFORMING)
    }
}

/// Parse a finite `f64`; NaN and infinities have no JSON representation.
fn finite_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("'{raw}' is not a number: {err}"))?;
    if !value.is_finite() {
        return Err(format!("'{raw}' is not a finite number"));
    }
    Ok(value)
}
