use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use regsweep_gc::{format_row, load_tags, run_from_config, GcConfig, GcReport, NAME_WIDTH};
use regsweep_store::FsStore;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = base_config(cli.config.as_deref())?;
    match cli.command {
        Command::Sweep(args) => cmd_sweep(sweep_config(config, args), &cli.format),
        Command::Tags(args) => cmd_tags(args.root.unwrap_or(config.root), &cli.format),
    }
}

fn base_config(path: Option<&Path>) -> anyhow::Result<GcConfig> {
    match path {
        Some(path) => GcConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GcConfig::default()),
    }
}

/// Apply command-line overrides on top of the file (or default) config.
fn sweep_config(mut config: GcConfig, args: SweepArgs) -> GcConfig {
    if let Some(root) = args.root {
        config.root = root;
    }
    if let Some(days) = args.retention_days {
        config.retention_days = days;
    }
    if args.execute {
        config.pretend = false;
    }
    config
}

fn cmd_sweep(config: GcConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let report = run_from_config(&config)
        .with_context(|| format!("collecting {}", config.root.display()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &GcReport) {
    for summary in &report.kept {
        println!("{}", format_row(&"+".green().to_string(), summary));
    }
    for summary in &report.stale {
        println!("{}", format_row(&"-".red().to_string(), summary));
    }
    if !report.pretend {
        println!(
            "{} Removed {} of {} planned images ({} already absent)",
            "✓".green().bold(),
            report.removed.len().to_string().bold(),
            report.planned.len(),
            report.already_absent.len()
        );
    }
}

fn cmd_tags(root: PathBuf, format: &OutputFormat) -> anyhow::Result<()> {
    let store = FsStore::open(&root)?;
    let tags = load_tags(&store).with_context(|| format!("loading tags from {}", root.display()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tags)?),
        OutputFormat::Text if tags.is_empty() => println!("No tags."),
        OutputFormat::Text => {
            for tag in &tags {
                println!(
                    "{:<width$} {} {} ({} layers)",
                    tag.key.to_string().yellow(),
                    tag.current_image.short().cyan(),
                    tag.last_update,
                    tag.ancestry.len(),
                    width = NAME_WIDTH
                );
            }
        }
    }
    Ok(())
}
