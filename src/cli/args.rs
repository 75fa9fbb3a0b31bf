//! Command-line argument parsing for lj2d runs

use clap::Parser;

/// 2D Lennard-Jones molecular dynamics with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Write log output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the trajectory log (time, energies, positions) to this file
    #[arg(short, long)]
    pub trajectory: Option<String>,

    /// Override the number of steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the switching window (0 selects the hard cutoff)
    #[arg(long)]
    pub switch_window: Option<f64>,
}
