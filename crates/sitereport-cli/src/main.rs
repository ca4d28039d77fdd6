// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SiteReport CLI: loads an export request, renders it, and delivers the
// document to the chosen sink.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use sitereport_bridge::{DeviceStorageSink, DownloadSink, ShareSink, platform_share_target};
use sitereport_core::error::Result;
use sitereport_core::{DirPhotoStore, ExportConfig, ExportRequest, ExportSink};
use sitereport_export::Exporter;

use cli::{Cli, Commands, ExportArgs, SinkChoice};

fn main() -> ExitCode {
    // Initialise tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Export(args) => run_export(cli.config.as_deref(), args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            eprintln!("Fehler: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_export(config_path: Option<&Path>, args: &ExportArgs) -> Result<()> {
    let config = match config_path {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    let request = load_request(&args.request)?;
    let photos = DirPhotoStore::new(&args.photos);
    let sink = build_sink(args)?;

    let exporter = Exporter::new(config);
    let (result, receipt) = exporter.export_to(&request, args.format, &photos, sink.as_ref())?;

    println!("{}", result.filename);
    if let Some(locator) = &receipt.locator {
        println!("  -> {locator}");
    }
    println!("{}", result.diagnostics.summary());
    for issue in &result.diagnostics.issues {
        println!("  - {issue}");
    }
    if result.diagnostics.suppressed_issues > 0 {
        println!("  ... {} weitere", result.diagnostics.suppressed_issues);
    }
    Ok(())
}

fn load_request(path: &Path) -> Result<ExportRequest> {
    let raw = std::fs::read_to_string(path)?;
    let request: ExportRequest = serde_json::from_str(&raw)?;
    tracing::info!(
        path = %path.display(),
        records = request.records.len(),
        columns = request.columns.len(),
        "Export request loaded"
    );
    Ok(request)
}

fn build_sink(args: &ExportArgs) -> Result<Box<dyn ExportSink>> {
    let storage = || match &args.out {
        Some(dir) => Ok(DeviceStorageSink::new(dir)),
        None => DeviceStorageSink::documents(),
    };
    let sink: Box<dyn ExportSink> = match args.sink {
        SinkChoice::Download => Box::new(match &args.out {
            Some(dir) => DownloadSink::new(dir),
            None => DownloadSink::user_downloads()?,
        }),
        SinkChoice::Storage => Box::new(storage()?),
        SinkChoice::Share => Box::new(ShareSink::new(storage()?, platform_share_target())),
    };
    Ok(sink)
}
