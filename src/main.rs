// src/main.rs
// Command-line entry point: diff, validate and convert parameter set files.

use clap::{Parser, Subcommand};
use log::info;
use paramstyle::io::SetsFile;
use paramstyle::DiffReport;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paramstyle")]
#[command(about = "Inspect and convert parameter set files", long_about = None)]
struct Cli {
    /// Sets or SheetSets file (.json, .toml, .yaml)
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report paths set differently between every pair of sets
    DiffAll,
    /// Report paths set differently between `Base` and each other set
    DiffFirst,
    /// Report paths set differently within one set
    DiffWithin {
        /// Set name
        set: String,
    },
    /// Check that every selector addresses a single target type
    Validate,
    /// Write the file out in another format, chosen by extension
    Convert {
        /// Output file
        output: PathBuf,
    },
    /// Print Rust code that rebuilds the sets
    Code,
}

fn print_report(report: &DiffReport) {
    if report.is_empty() {
        info!("No conflicting parameter values");
    } else {
        print!("{}", report);
    }
}

/// Loads the file named on the command line and runs the requested command.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let loaded = SetsFile::open(&cli.file)?;
    info!("Loaded {}", cli.file.display());

    match cli.command {
        Commands::DiffAll => print_report(&loaded.diffs_all()),
        Commands::DiffFirst => print_report(&loaded.diffs_first()?),
        Commands::DiffWithin { set } => print_report(&loaded.diffs_within(&set)?),
        Commands::Validate => {
            loaded.validate()?;
            info!("All selectors address a single target type");
        }
        Commands::Convert { output } => {
            loaded.save(&output)?;
            info!("Wrote {}", output.display());
        }
        Commands::Code => println!("{}", loaded.write_code()),
    }

    Ok(())
}
