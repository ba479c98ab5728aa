use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Default, Parser)]
pub struct ArgsInteractive {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory with `shaders/` and `images/` overriding the built-in resources
    #[arg(short, long)]
    pub assets: Option<PathBuf>,
    /// Seed for the random palettes
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Width of the window
    #[arg(long)]
    pub width: Option<u32>,
    /// Height of the window
    #[arg(long)]
    pub height: Option<u32>,
}
