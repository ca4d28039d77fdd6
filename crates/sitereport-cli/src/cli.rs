// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sitereport_core::ExportFormat;

/// SiteReport - field-report export engine
#[derive(Parser, Debug)]
#[command(name = "sitereport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON export configuration
    #[arg(short, long, global = true, env = "SITEREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a report request to XLSX or PDF
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export request as JSON
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory photo and logo references resolve against
    #[arg(short, long, default_value = ".")]
    pub photos: PathBuf,

    /// Output format (xlsx or pdf)
    #[arg(short, long, default_value = "xlsx")]
    pub format: ExportFormat,

    /// Where the finished document goes
    #[arg(short, long, value_enum, default_value_t = SinkChoice::Download)]
    pub sink: SinkChoice,

    /// Target directory, overriding the sink's platform default
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkChoice {
    /// Write into the download folder without overwriting
    Download,
    /// Store in the app documents folder
    Storage,
    /// Store, then open the platform share sheet
    Share,
}
