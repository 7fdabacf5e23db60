use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "RS-LAP",
    about = "A lap-based race weekend simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (per-lap events and overtake resolution)
    #[clap(short, long)]
    pub debug: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulation runs (more than one run prints a win tally instead of the race)
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the simulation parameter file
    #[clap(short, long)]
    pub parfile_path: PathBuf,

    /// Set path to a simulation constants file (defaults are used if not set)
    #[clap(short, long)]
    pub consts_path: Option<PathBuf>,

    /// Set seed of the random number generator (runs i > 0 use seed + i)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Override the track given in the parameter file
    #[clap(short, long)]
    pub track: Option<String>,

    /// Override the number of laps given in the parameter file
    #[clap(short, long)]
    pub laps: Option<u32>,

    /// Set playback delay between two printed laps in milliseconds
    #[clap(long, default_value = "0")]
    pub lap_delay_ms: u64,

    /// Write lap and race time tables to this file
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Write the final classification to this CSV file
    #[clap(long)]
    pub csv: Option<PathBuf>,
}
