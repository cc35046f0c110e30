//! CLI entry point for the layered token generator

use clap::Parser;
use tokenator::io::cli::{Cli, TokenProcessor};

fn main() -> tokenator::Result<()> {
    let cli = Cli::parse();
    let mut processor = TokenProcessor::new(cli);
    processor.process()
}
