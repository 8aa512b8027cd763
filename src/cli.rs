use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extracts per-fracture statistics from transport snapshots into CSV tables
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate every run of the batch and write the CSV tables
    Extract {
        /// Batch configuration (TOML)
        config: PathBuf,

        /// Stop at the first failing run
        #[arg(long)]
        fail_fast: bool,
    },
    /// Copy the figures listed under [stage] into the article folder
    Stage {
        /// Batch configuration (TOML)
        config: PathBuf,
    },
}

pub fn get_args() -> Args {
    Args::parse()
}

pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
