use clap::Parser;
use std::path::PathBuf;

use smdgen::song::listing::write_listing;
use smdgen::{ConvertOptions, Converter, LinkBytes};

#[derive(Parser, Debug)]
#[command(name = "smdgen")]
#[command(version = "0.1.0")]
#[command(about = "MIDI to DSE smdl sequence converter", long_about = None)]
struct Args {
    /// Input MIDI file
    input: PathBuf,

    /// Output SMD file
    #[arg(required_unless_present = "listing")]
    output: Option<PathBuf>,

    /// Link identifier shared with the instrument bank, 4 hex digits
    #[arg(short, long, default_value = "0000")]
    link: LinkBytes,

    /// Loop back to this tick when the song ends
    #[arg(long = "loop", value_name = "TICK")]
    loop_tick: Option<u64>,

    /// Song name stored in the header (defaults to the output file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Print the instruction listing instead of writing a file
    #[arg(long)]
    listing: bool,

    /// Where to write the preset selection (defaults to <output>.json)
    #[arg(short, long)]
    presets: Option<PathBuf>,
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

    let mut options = ConvertOptions::new(args.link);
    options.loop_tick = args.loop_tick;
    options.name = args
        .name
        .clone()
        .or_else(|| {
            args.output
                .as_ref()
                .and_then(|path| path.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    let converter = Converter::new(options);

    if args.listing {
        let song = converter.load_song(&std::fs::read(&args.input)?)?;
        print!("{}", write_listing(&song));
        return Ok(());
    }

    let output = args
        .output
        .ok_or_else(|| smdgen::Error::Config("an output file is required".into()))?;
    let selection = converter.convert_file(&args.input, &output)?;

    let presets = args
        .presets
        .unwrap_or_else(|| output.with_extension("json"));
    selection.save(&presets)?;
    tracing::info!("Preset selection written to {}", presets.display());

    Ok(())
}
