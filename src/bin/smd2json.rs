//! SMD to JSON converter

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use smdgen::smd::{SmdJson, SmdReader};

#[derive(Parser, Debug)]
#[command(name = "smd2json")]
#[command(version = "0.1.0")]
#[command(about = "Dump SMD sequence files as JSON", long_about = None)]
struct Args {
    /// Input SMD file
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data = std::fs::read(&args.input)?;
    let mut reader = SmdReader::new(&data);
    let info = reader.parse_header()?;
    let song = reader.parse_song()?;
    let tracks = reader.parse_tracks()?;

    if info.file_length as usize != data.len() {
        tracing::warn!(
            "Header declares {} bytes but the file has {}",
            info.file_length,
            data.len()
        );
    }
    if song.track_count as usize != tracks.len() {
        tracing::warn!(
            "Song chunk declares {} tracks but the file has {}",
            song.track_count,
            tracks.len()
        );
    }

    let smd_json = SmdJson::new(&info, &song, &tracks);
    let json_string = if args.compact {
        serde_json::to_string(&smd_json)?
    } else {
        serde_json::to_string_pretty(&smd_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
