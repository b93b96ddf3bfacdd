//! Vector Video
//!
//! Streams raw 240×160 frames to the Vector SPI LCD. The panel controller
//! is detected at startup; Santek panels crop the frame unless scaling is
//! requested, Midas panels always use 2× decimation.
//!
//! # Usage
//!
//! ```bash
//! # Play a frame dump, cropped
//! vector-video frames.raw
//!
//! # Nearest-neighbour scaled (Santek only)
//! vector-video frames.raw --scaled=true
//!
//! # Override hardware paths
//! vector-video frames.raw --config /etc/vector-lcd.toml --verbose
//! ```
//!
//! SIGINT, SIGTERM or SIGHUP stop playback; the exit code is then 0.

mod signal;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use source::{FrameSource, RawFrameFile};
use vector_lcd::{FrameStats, LcdConfig, Video, VideoContext};

/// Vector Video
///
/// Real-time frame output to the Vector SPI LCD
#[derive(Parser, Debug)]
#[command(name = "vector-video")]
#[command(version = "0.1.0")]
#[command(about = "Stream raw 240x160 frames to the Vector SPI LCD")]
struct Cli {
    /// Raw frame file (concatenated 240x160 little-endian 32-bit pixels)
    frames: PathBuf,

    /// Scale to the full panel instead of cropping (Santek panels only)
    #[arg(
        short,
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    scaled: Option<bool>,

    /// TOML file overriding hardware defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<LcdConfig> {
    let config = match &cli.config {
        Some(path) => LcdConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LcdConfig::default(),
    };

    Ok(match cli.scaled {
        Some(scaled) => config.with_scaled(scaled),
        None => config,
    })
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut source = RawFrameFile::open(&cli.frames)?;

    signal::install()?;

    let video = Video::start(&config).context("Failed to start LCD output")?;
    let context = video.context();

    let frame_time = Duration::from_micros(config.source.frame_time_us);
    let started = Instant::now();
    let mut submitted = 0u64;

    while !signal::shutdown_requested() {
        let frame_start = Instant::now();

        video.submit(source.next_frame());
        submitted += 1;

        if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!("Shutting down...");
    let stats = video.stop();
    print_summary(&source, context, submitted, started.elapsed(), &stats);

    Ok(())
}

fn print_summary(
    source: &RawFrameFile,
    context: VideoContext,
    submitted: u64,
    elapsed: Duration,
    stats: &FrameStats,
) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "Playback Summary".cyan().bold());
    println!("{}", "=".repeat(60));

    println!("  Source:      {} ({} frames)", source.path().display(), source.len());
    println!("  Panel:       {}", context.variant);
    println!("  Mode:        {}", context.mode);
    println!("  Duration:    {:.1}s", elapsed.as_secs_f64());
    println!("  Submitted:   {}", submitted);
    println!("  Rendered:    {}", stats.frames_rendered.to_string().green());

    let superseded = stats.frames_superseded.to_string();
    if stats.frames_superseded > 0 {
        println!("  Superseded:  {}", superseded.yellow());
    } else {
        println!("  Superseded:  {}", superseded);
    }

    let faults = stats.transfer_faults.to_string();
    if stats.transfer_faults > 0 {
        println!("  SPI faults:  {}", faults.red().bold());
    } else {
        println!("  SPI faults:  {}", faults.green());
    }

    if elapsed.as_secs_f64() > 0.0 {
        println!(
            "  Output rate: {:.1} fps",
            stats.frames_rendered as f64 / elapsed.as_secs_f64()
        );
    }

    println!("{}", "=".repeat(60));
}
