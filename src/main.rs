//! CLI entry point for MRF binary image denoising

use clap::Parser;
use mrfdenoise::io::cli::{Cli, FileProcessor};

fn main() -> mrfdenoise::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()?;
    Ok(())
}
