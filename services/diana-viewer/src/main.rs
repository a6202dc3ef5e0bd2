//! Diana viewer console.
//!
//! Reads commands from stdin (or `--exec`) and keeps the current figure in
//! the display PNG.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use diana_viewer::{parse, Outcome, PngFileSink, Viewer, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "diana")]
#[command(about = "Interactive map viewer for weather-forecast and WRF model output")]
struct Args {
    /// Configuration file (YAML)
    #[arg(short, long, env = "DIANA_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset path, OPeNDAP URL, or `synthetic`
    #[arg(short, long)]
    source: Option<String>,

    /// Initial projection
    #[arg(short, long)]
    projection: Option<String>,

    /// PNG file replaced after every redraw
    #[arg(short, long)]
    display: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Figure height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// GeoJSON coastlines
    #[arg(long)]
    coastlines: Option<PathBuf>,

    /// Equirectangular image for the background overlay
    #[arg(long)]
    background_image: Option<PathBuf>,

    /// Leading axis indexing: declared or fixed-leading
    #[arg(long)]
    rank_policy: Option<String>,

    /// Load the dataset before reading commands
    #[arg(long)]
    load: bool,

    /// Command to run before reading stdin (repeatable)
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,

    /// Run the --exec commands and exit without reading stdin
    #[arg(long)]
    batch: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    #[cfg(feature = "netcdf")]
    gridded_data::silence_hdf5_errors();

    let config = build_config(&args)?;
    let sink = PngFileSink::new(&config.output.display);
    let mut viewer =
        Viewer::from_config(&config, Box::new(sink)).context("Failed to start viewer")?;

    info!(
        source = %viewer.source(),
        projection = %viewer.state().projection,
        display = %config.output.display.display(),
        "Starting diana viewer"
    );

    viewer.refresh().context("Initial redraw failed")?;

    let mut startup = Vec::new();
    if args.load || config.data.load_on_start {
        startup.push("load".to_string());
    }
    startup.extend(args.exec.iter().cloned());

    for line in &startup {
        if run_line(&mut viewer, line) {
            return Ok(());
        }
    }
    if args.batch {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("diana> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if run_line(&mut viewer, &line) {
            break;
        }
    }

    info!("Viewer closed");
    Ok(())
}

/// Defaults, then the config file, then `DIANA_*` variables, then flags.
fn build_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = ViewerConfig::load_or_default(args.config.as_deref())?;
    config
        .apply_process_env()
        .context("Invalid DIANA_* environment variable")?;

    if let Some(source) = &args.source {
        config.data.source = source.clone();
    }
    if let Some(projection) = &args.projection {
        config.view.projection = projection.clone();
    }
    if let Some(display) = &args.display {
        config.output.display = display.clone();
    }
    if let Some(width) = args.width {
        config.figure.width = width;
    }
    if let Some(height) = args.height {
        config.figure.height = height;
    }
    if let Some(path) = &args.coastlines {
        config.resources.coastlines = Some(path.clone());
    }
    if let Some(path) = &args.background_image {
        config.resources.background_image = Some(path.clone());
    }
    if let Some(policy) = &args.rank_policy {
        config.data.rank_policy = policy.parse()?;
    }
    Ok(config)
}

/// Run one console line. Returns true when the session should end.
fn run_line(viewer: &mut Viewer, line: &str) -> bool {
    let command = match parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return false,
        Err(e) => {
            println!("{}", e);
            return false;
        }
    };

    let redraws = command.redraws();
    match viewer.execute(command) {
        Ok(Outcome::Quit) => true,
        Ok(Outcome::Message(text)) => {
            println!("{}", text);
            false
        }
        Ok(Outcome::Unchanged) if redraws => {
            println!("ignored, view unchanged");
            false
        }
        Ok(Outcome::Redrawn) | Ok(Outcome::Unchanged) => false,
        Err(e) => {
            if e.is_input_error() {
                warn!(error = %e, "Command rejected");
            } else {
                error!(error = %e, "Command failed");
            }
            println!("error: {}", e);
            false
        }
    }
}
