// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! partdiff CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use partdiff::cli::{Reporter, Runner};
use partdiff::{EngineConfig, PartSlot};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "partdiff")]
#[command(about = "Mesh statistics and part comparison for STL and OBJ models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./partdiff.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics and material of a single model
    Stats {
        /// Input STL or OBJ file
        input: PathBuf,

        /// Material library for an OBJ input
        #[arg(long, value_name = "FILE")]
        mtl: Option<PathBuf>,

        /// Emit JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Compare an original part against a modified one
    Compare {
        /// Original STL or OBJ file
        original: PathBuf,

        /// Modified STL or OBJ file
        modified: PathBuf,

        /// Material library for the original part
        #[arg(long, value_name = "FILE")]
        original_mtl: Option<PathBuf>,

        /// Material library for the modified part
        #[arg(long, value_name = "FILE")]
        modified_mtl: Option<PathBuf>,

        /// Material edit on the original part, e.g. density=2.7
        #[arg(long = "set-original", value_name = "KEY=VALUE")]
        set_original: Vec<String>,

        /// Material edit on the modified part, e.g. color=#ff0000
        #[arg(long = "set-modified", value_name = "KEY=VALUE")]
        set_modified: Vec<String>,

        /// Emit JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// List the material properties, their defaults and ranges
    Schema,

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        Reporter::report_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Stats { input, mtl, json } => {
            let config = load_config(cli.config.as_deref())?;
            stats_command(config, input, mtl.as_deref(), *json)?;
        }
        Commands::Compare {
            original,
            modified,
            original_mtl,
            modified_mtl,
            set_original,
            set_modified,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let runner = Runner::new(config);

            runner.load(PartSlot::Original, original, original_mtl.as_deref())?;
            runner.load(PartSlot::Modified, modified, modified_mtl.as_deref())?;
            runner.apply_assignments(PartSlot::Original, set_original)?;
            runner.apply_assignments(PartSlot::Modified, set_modified)?;

            let report = runner.compare()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                Reporter::report_comparison(
                    &original.display().to_string(),
                    &modified.display().to_string(),
                    &report,
                );
            }
        }
        Commands::Schema => Reporter::report_schema(),
        Commands::Version => {
            println!("partdiff v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn stats_command(config: EngineConfig, input: &Path, mtl: Option<&Path>, json: bool) -> Result<()> {
    let runner = Runner::new(config);
    let loaded = runner.load(PartSlot::Original, input, mtl)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.snapshot)?);
    } else {
        Reporter::report_stats(
            &input.display().to_string(),
            &loaded.snapshot,
            loaded.duration,
        );
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let mut config = EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.apply_overrides(|name| std::env::var(name).ok())?;
            info!(path = %path.display(), "using config file");
            Ok(config)
        }
        None => EngineConfig::load().context("Failed to load configuration"),
    }
}

fn init_tracing(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "partdiff=debug",
            _ => "partdiff=trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}
