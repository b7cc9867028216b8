// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Gdfcodec CLI
//!
//! Command-line tool for inspecting GDF particle-tracking output files.
//!
//! ## Usage
//!
//! ```sh
//! # Show header metadata and group counts
//! gdfcodec info beam.gdf
//!
//! # List field names and lengths per record
//! gdfcodec fields beam.gdf
//!
//! # Dump decoded records as JSON
//! gdfcodec dump beam.gdf --pretty
//! ```

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use gdfcodec::{DecodeOptions, DecodeOutput, GdfReader, Record, TracingSink};

/// Gdfcodec - GDF particle-tracking data toolkit
///
/// Decode simulator output files into time-slice, position-slice, and
/// trajectory records.
#[derive(Parser, Clone)]
#[command(name = "gdfcodec")]
#[command(about = "Inspect and dump GDF particle-tracking output files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Show header metadata and per-kind group counts
    Info {
        /// GDF file to inspect
        file: PathBuf,
    },

    /// List field names, types, and lengths for every record
    Fields {
        /// GDF file to inspect
        file: PathBuf,
    },

    /// Dump all decoded records as JSON
    Dump {
        /// GDF file to dump
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Progress bar wrapper driven by the decoder's fractional callback.
struct Progress {
    inner: Option<indicatif::ProgressBar>,
}

impl Progress {
    const TICKS: u64 = 1000;

    fn new(prefix: &str) -> Self {
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(Self::TICKS);
            pb.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}%")
                    .unwrap()
                    .progress_chars("=>-"),
            );
            pb.set_prefix(prefix.to_string());
            Some(pb)
        } else {
            None
        };
        Progress { inner }
    }

    fn update(&self, fraction: f64) {
        if let Some(pb) = &self.inner {
            pb.set_position((fraction * Self::TICKS as f64) as u64);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.inner {
            pb.finish_and_clear();
        }
    }
}

fn decode_with_progress(file: &PathBuf) -> Result<(GdfReader, DecodeOutput)> {
    let reader = GdfReader::open(file)?;
    let bar = Progress::new("decode");
    let mut sink = TracingSink;
    let mut on_progress = |fraction: f64| bar.update(fraction);
    let output = reader.decode(
        DecodeOptions::default()
            .warnings(&mut sink)
            .progress(&mut on_progress),
    )?;
    bar.finish();
    Ok((reader, output))
}

fn format_created(output: &DecodeOutput) -> String {
    match output.header.created {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "unknown".to_string(),
    }
}

fn cmd_info(file: PathBuf) -> Result<()> {
    let (reader, output) = decode_with_progress(&file)?;
    let header = &output.header;

    println!("File:        {}", reader.path());
    println!("Size:        {} bytes", reader.file_size());
    println!(
        "Magic:       {} ({})",
        header.magic,
        if header.magic_ok() { "ok" } else { "MISMATCH" }
    );
    println!("Created:     {}", format_created(&output));
    println!(
        "Creator:     {} v{}.{}",
        header.creator, header.creator_major, header.creator_minor
    );
    if !header.destination.is_empty() {
        println!("Destination: {}", header.destination);
    }
    println!(
        "Format:      {}.{}",
        header.format_major, header.format_minor
    );
    println!();
    println!("Time slices:     {}", output.counts.time);
    println!("Position slices: {}", output.counts.position);
    println!("Trajectories:    {}", output.counts.trajectory);
    if output.counts.unknown > 0 {
        println!("Unknown groups:  {} (discarded)", output.counts.unknown);
    }
    Ok(())
}

fn print_record_fields(label: &str, index: usize, record: &Record) {
    println!("{label}[{index}]:");
    for (name, value) in record.iter() {
        println!("  {name:<10} {:<8} x {}", value.type_name(), value.len());
    }
}

fn cmd_fields(file: PathBuf) -> Result<()> {
    let (_, output) = decode_with_progress(&file)?;
    for (i, record) in output.time_slices.iter().enumerate() {
        print_record_fields("time", i, record);
    }
    for (i, record) in output.position_slices.iter().enumerate() {
        print_record_fields("position", i, record);
    }
    for (i, record) in output.trajectories.iter().enumerate() {
        print_record_fields("trajectory", i, record);
    }
    Ok(())
}

fn cmd_dump(file: PathBuf, pretty: bool) -> Result<()> {
    let (_, output) = decode_with_progress(&file)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => cmd_info(file),
        Commands::Fields { file } => cmd_fields(file),
        Commands::Dump { file, pretty } => cmd_dump(file, pretty),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
