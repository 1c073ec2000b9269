//! CLI for the batch-rewrite tool.

use anyhow::{Context, Result, bail};
use batch_rewrite::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rewrite")]
#[command(author, version, about = "Batch find-and-replace across a source tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunOptions {
    /// Directory the file patterns are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Report changes without writing them
    #[arg(long)]
    dry_run: bool,

    /// Print a colorized diff of every change
    #[arg(long)]
    diff: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rules in a YAML or JSON config file
    Run {
        /// Path to the config file
        #[arg(short, long)]
        config: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Rename `._id` field accesses to `.id` under src/
    FixIds {
        #[command(flatten)]
        options: RunOptions,
    },

    /// Ease framer-motion transitions and soften hover animations
    SmoothMotion {
        #[command(flatten)]
        options: RunOptions,
    },

    /// List the built-in presets and their rules
    Presets,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "batch_rewrite=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, options } => {
            let loaded = RewriteConfig::from_file(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            cmd_run(loaded, options)
        }
        Commands::FixIds { options } => cmd_run(presets::fix_ids(), options),
        Commands::SmoothMotion { options } => cmd_run(presets::smooth_motion(), options),
        Commands::Presets => cmd_presets(),
    }
}

fn cmd_run(mut config: RewriteConfig, options: RunOptions) -> Result<()> {
    if options.dry_run {
        config.dry_run = true;
    }

    let rewrite = config
        .to_rewrite(&options.root)
        .with_context(|| format!("Invalid rewrite '{}'", config.name))?;
    let report = rewrite.apply().context("Rewrite failed")?;

    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    for path in report.changed_paths() {
        println!("{}{} {}", prefix, config.label, path.display());
    }

    if options.diff && report.files_modified() > 0 {
        println!("\n{}", report.colorized_diff());
        println!("{}", report.summary());
    }

    println!("{}{}", prefix, config.format_summary(report.files_modified()));

    let failures = report.failures();
    if !failures.is_empty() {
        for (path, error) in &failures {
            eprintln!("error: {}: {}", path.display(), error);
        }
        bail!("{} file(s) could not be rewritten", failures.len());
    }

    Ok(())
}

fn cmd_presets() -> Result<()> {
    for config in presets::all() {
        println!("{} - {}", config.name, config.description);
        println!("  files: {}", config.patterns.join(", "));
        let transforms = config
            .transforms()
            .with_context(|| format!("Preset '{}' is invalid", config.name))?;
        for (idx, description) in transforms.describe().iter().enumerate() {
            println!("  {:>2}. {}", idx + 1, description);
        }
        println!();
    }
    Ok(())
}
