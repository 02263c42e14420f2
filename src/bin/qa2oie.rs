//! Command-line entry point for QA-SRL to Open IE conversion.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use qa2oie::{Qa2Oie, Result, SlotMask};

/// Convert QA-SRL annotations into Open IE extraction tuples.
#[derive(Parser)]
#[command(name = "qa2oie", version, about)]
struct Cli {
    /// QA-SRL annotation file to convert.
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Output file for Open IE extractions (one per line).
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Optional bare-sentence listing for a downstream Open IE tool
    /// (opened in append mode).
    #[arg(long = "oieinput", value_name = "PATH")]
    oie_input: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<()> {
    let pipeline = Qa2Oie::from_file(&cli.input, &SlotMask::identity())?;
    pipeline.write_oie(&cli.output)?;
    if let Some(path) = &cli.oie_input {
        pipeline.write_oie_input(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
