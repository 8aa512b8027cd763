use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

mod cli;

use cli::{Command, get_args, log_level};
use frac_stats::batch::run_batch;
use frac_stats::config::BatchConfig;
use frac_stats::stage::stage_figures;

fn main() -> Result<()> {
    let args = get_args();
    env_logger::builder()
        .filter_level(log_level(args.verbose))
        .init();

    match args.command {
        Command::Extract { config, fail_fast } => extract(&config, fail_fast),
        Command::Stage { config } => stage(&config),
    }
}

fn extract(config_path: &Path, fail_fast: bool) -> Result<()> {
    let config = BatchConfig::load(config_path)?;
    let fail_fast = fail_fast || config.fail_fast;
    let runs = config.runs();

    println!("Batch Configuration:");
    println!("  Methods: {}", config.methods.join(", "));
    println!("  Grids: {}", config.grids.join(", "));
    println!("  Runs per grid: {}", config.runs_per_grid);
    println!(
        "  Steps: {} (dt = {}), regions: {}, field: {}",
        config.steps, config.time_step, config.regions, config.field
    );
    println!("  Output: {:?}", config.output_root);

    let pb = ProgressBar::new(runs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let report = run_batch(&config, &runs, fail_fast, &pb).context("Failed to write count tables")?;

    println!(
        "\nExtraction complete: {} runs succeeded, {} failed",
        report.completed.len(),
        report.failed.len()
    );
    if report.nan_rows() > 0 {
        println!("  {} rows contained NaN values (see warnings)", report.nan_rows());
    }
    for failure in &report.failed {
        eprintln!("  {}: {}", failure.run, failure.error);
    }

    anyhow::ensure!(
        report.is_success(),
        "{} of {} runs failed",
        report.failed.len(),
        runs.len()
    );
    Ok(())
}

fn stage(config_path: &Path) -> Result<()> {
    let config = BatchConfig::load(config_path)?;
    let stage = config
        .stage
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No [stage] section in {:?}", config_path))?;

    let copied = stage_figures(stage).context("Failed to stage figures")?;
    println!("Copied {} figures to {:?}", copied, stage.destination);
    Ok(())
}
