//! Build the instrument bank matching an SMD sequence

use clap::Parser;
use std::path::PathBuf;

use smdgen::container::Timestamp;
use smdgen::swd::{bank, Library};
use smdgen::PresetSelection;

#[derive(Parser, Debug)]
#[command(name = "swdgen")]
#[command(version = "0.1.0")]
#[command(about = "Generate an swdl instrument bank from a preset selection", long_about = None)]
struct Args {
    /// Preset selection written by smdgen
    selection: PathBuf,

    /// Output SWD file
    output: PathBuf,

    /// Resource library holding presets/ and samples/
    #[arg(short, long, default_value = ".")]
    library: PathBuf,
}

fn main() -> Result<(), smdgen::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let selection = PresetSelection::load(&args.selection)?;
    let library = Library::new(&args.library);
    bank::generate(&selection, &library, &args.output, Timestamp::now())?;

    Ok(())
}
