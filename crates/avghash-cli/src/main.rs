mod batch;
mod config;
mod report;

use crate::config::{Config, Mode};
use crate::report::{DiffReport, Elapsed};
use anyhow::{Context, Error, Result, bail};
use avghash::Hasher;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Hash images by average luminance and compare them for similarity.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Working mode
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Input image file (JPEG or PNG); repeat for several images
    #[arg(short = 'i', long = "input")]
    inputs: Vec<PathBuf>,

    /// Output image file for "scale" and "gray"
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Side length of the square produced by "scale"
    #[arg(long)]
    side: Option<u32>,

    /// Side length images are reduced to before fingerprinting
    #[arg(long)]
    hash_side: Option<u32>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries reports.
    // Override with RUST_LOG env var, e.g.: RUST_LOG=debug
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = resolve_config(&args)?;
    info!("Running in {:?} mode", config.mode);

    match config.mode {
        Mode::Hash => run_hash(&config, args.inputs).await,
        Mode::Diff => run_diff(&config, args.inputs).await,
        Mode::Scale => run_scale(&config, args.inputs).await,
        Mode::Gray => run_gray(&config, args.inputs).await,
    }
}

/// Config file values, overridden by whatever was given on the command line.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => match Config::load_from_file(&path) {
            Ok(c) => {
                info!("Config loaded from {:?}", path);
                c
            }
            Err(e) => {
                if args.config.is_some() {
                    warn!("Failed to load config from {:?}: {:#}. Using defaults.", path, e);
                } else {
                    info!("No usable config at {:?}: {:#}. Using defaults.", path, e);
                }
                Config::default_config()
            }
        },
        None => Config::default_config(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(side) = args.side {
        config.side = side;
    }
    if let Some(hash_side) = args.hash_side {
        config.hash_side = hash_side;
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    config.json |= args.json;

    config.validate()?;
    Ok(config)
}

async fn run_hash(config: &Config, inputs: Vec<PathBuf>) -> Result<()> {
    if inputs.is_empty() {
        bail!("no input images given, try --help for more information");
    }

    let hasher = Hasher::new(config.hash_side)?;
    let entries = batch::hash_all(hasher, inputs).await;
    let failed = entries.iter().filter(|e| e.is_failed()).count();

    if config.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry);
        }
        println!("Hashing finished.");
    }

    info!(
        hashed = entries.len() - failed,
        failed, "Hashing finished"
    );
    Ok(())
}

async fn run_diff(config: &Config, inputs: Vec<PathBuf>) -> Result<()> {
    let [src, dst, rest @ ..] = inputs.as_slice() else {
        bail!("comparing needs two input images, try --help for more information");
    };
    if !rest.is_empty() {
        warn!("Only the first two images are compared, ignoring {} more", rest.len());
    }

    let hasher = Hasher::new(config.hash_side)?;
    let (src, dst) = (src.clone(), dst.clone());
    let (task_src, task_dst) = (src.clone(), dst.clone());
    let (similarity, elapsed) = tokio::task::spawn_blocking(move || {
        let started = Utc::now();
        let similarity = hasher.compare_files(&task_src, &task_dst);
        (similarity, Utc::now() - started)
    })
    .await
    .context("Compare task joined with error")?;
    let similarity = similarity.context("Failed to compare images")?;

    let report = DiffReport::new(src, dst, similarity, Elapsed::new(elapsed));
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
        println!("Comparison finished.");
    }
    Ok(())
}

async fn run_scale(config: &Config, inputs: Vec<PathBuf>) -> Result<()> {
    let input = first_input(inputs)?;
    let output = config.output.clone();
    let side = config.side;

    let written = tokio::task::spawn_blocking(move || avghash::scale_and_save(input, output, side))
        .await
        .context("Scale task joined with error")?
        .context("Failed to scale image")?;

    print_written(config, "Scaling", &written)
}

async fn run_gray(config: &Config, inputs: Vec<PathBuf>) -> Result<()> {
    let input = first_input(inputs)?;
    let output = config.output.clone();

    let written = tokio::task::spawn_blocking(move || avghash::gray_and_save(input, output))
        .await
        .context("Gray task joined with error")?
        .context("Failed to convert image to grayscale")?;

    print_written(config, "Grayscale conversion", &written)
}

fn first_input(inputs: Vec<PathBuf>) -> Result<PathBuf> {
    let mut inputs = inputs.into_iter();
    let Some(input) = inputs.next() else {
        bail!("no input image given, try --help for more information");
    };
    let ignored = inputs.count();
    if ignored > 0 {
        warn!("Only the first image is used, ignoring {} more", ignored);
    }
    Ok(input)
}

fn print_written(config: &Config, operation: &str, written: &Path) -> Result<()> {
    if config.json {
        println!("{}", written_json(written)?);
    } else {
        println!("{} finished: {}", operation, written.display());
    }
    Ok(())
}

/// `{"output": "<path>"}`. Paths that are not valid UTF-8 are rendered lossily.
fn written_json(written: &Path) -> Result<String> {
    #[derive(Serialize)]
    struct Written {
        output: String,
    }
    let report = Written {
        output: written.to_string_lossy().into_owned(),
    };
    Ok(serde_json::to_string(&report)?)
}
