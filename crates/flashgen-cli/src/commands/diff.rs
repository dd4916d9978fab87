use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Args;
use flashgen_core::ConfigTree;

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Left config file.
    pub left: PathBuf,
    /// Right config file.
    pub right: PathBuf,
}

pub fn run(args: &DiffArgs) -> Result<(), Box<dyn Error>> {
    let left = ConfigTree::from_file(&args.left)?;
    let right = ConfigTree::from_file(&args.right)?;

    let diff = left.diff(&right);
    if diff.is_empty() {
        println!("configs match");
        return Ok(());
    }
    for key in &diff.presence {
        println!("presence: {key}");
    }
    for key in &diff.values {
        println!("value: {key}");
    }
    process::exit(1);
}
