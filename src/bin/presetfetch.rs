//! Harvest presets and samples from the game's music banks

use clap::Parser;
use std::path::PathBuf;

use smdgen::swd::{harvest, Library};

#[derive(Parser, Debug)]
#[command(name = "presetfetch")]
#[command(version = "0.1.0")]
#[command(about = "Extract named presets and samples from bgmNNNN.swd banks", long_about = None)]
struct Args {
    /// Directory holding the bgmNNNN.swd files
    bgm_dir: PathBuf,

    /// Resource library to fill
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

    if !args.bgm_dir.is_dir() {
        return Err(smdgen::Error::Config(format!(
            "{} is not a directory",
            args.bgm_dir.display()
        )));
    }

    let harvest = harvest::harvest_dir(&args.bgm_dir)?;
    harvest.save(&Library::new(&args.library))?;

    Ok(())
}
