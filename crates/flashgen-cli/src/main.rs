use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    diff::{self, DiffArgs},
    generate::{self, GenerateArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "flashgen", about = "Flash cache simulator config sweep generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a sweep description into one config file per variant.
    Generate(GenerateArgs),
    /// Compare two config files structurally.
    Diff(DiffArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Diff(args) => diff::run(&args),
    }
}
