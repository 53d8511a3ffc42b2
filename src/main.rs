use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use imgmeta::inputs::{expand_inputs, read_buffer};
use imgmeta::{ParseError, ParseOptions, ParsedImageMetadata};

#[derive(Parser)]
#[command(name = "imgmeta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print dimensions, color mode and EXIF tags of JPEG and PNG files")]
struct Cli {
    /// Image files, or directories whose files are all inspected
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// JSON file with parse options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip EXIF extraction
    #[arg(long)]
    no_exif: bool,

    /// Locate the 0th IFD through the TIFF header offset field
    #[arg(long)]
    honor_ifd0_offset: bool,

    /// Exit with an error if any file fails to parse
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = load_options(&cli)?;
    let paths = expand_inputs(&cli.paths).context("Failed to enumerate inputs")?;
    debug!(count = paths.len(), "inputs");

    let results: Vec<(PathBuf, Result<ParsedImageMetadata>)> = paths
        .into_par_iter()
        .map(|path| {
            let result = parse_file(&path, &options);
            (path, result)
        })
        .collect();

    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(metadata) => {
                let json = serde_json::to_string(&metadata)?;
                println!("{}: {}", path.display(), json);
            }
            Err(err) if is_unsupported(&err) && !cli.strict => {
                debug!(path = %path.display(), "not a JPEG or PNG");
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: skipped: {:#}", path.display(), err);
            }
        }
    }

    if cli.strict && failures > 0 {
        bail!("{} file(s) failed to parse", failures);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(cli: &Cli) -> Result<ParseOptions> {
    let mut options = match &cli.config {
        Some(path) => ParseOptions::load(path)?,
        None => ParseOptions::default(),
    };
    if cli.no_exif {
        options = options.without_exif();
    }
    if cli.honor_ifd0_offset {
        options = options.honoring_ifd0_offset();
    }
    Ok(options)
}

fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParsedImageMetadata> {
    let data = read_buffer(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(imgmeta::parse_with(&data, options)?)
}

fn is_unsupported(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::UnsupportedFormat)
    )
}
