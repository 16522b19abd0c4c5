//! Monoframe Player
//!
//! Runs a scene through the frame-paced console on the host, presenting
//! frames to the terminal, to PNG snapshots, or nowhere.

mod config;
mod platform;
mod scenes;
mod sinks;

use anyhow::{Context, Result};
use clap::Parser;
use monoframe_core::{Console, FrameScheduler, Platform};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, OutputKind};
use platform::HostPlatform;
use sinks::FrameSink;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliOutput {
    /// Half-block rendering on stdout
    Terminal,
    /// Numbered PNG snapshots
    Png,
    /// Discard frames
    None,
}

impl From<CliOutput> for OutputKind {
    fn from(output: CliOutput) -> Self {
        match output {
            CliOutput::Terminal => OutputKind::Terminal,
            CliOutput::Png => OutputKind::Png,
            CliOutput::None => OutputKind::Null,
        }
    }
}

#[derive(Parser)]
#[command(name = "monoframe")]
#[command(about = "Play monoframe scenes on the host")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene to play
    #[arg(short, long)]
    scene: Option<String>,

    /// Target frames per second
    #[arg(short = 'r', long)]
    frame_rate: Option<u32>,

    /// Stop after this many frames (0 runs until interrupted)
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Output sink
    #[arg(short, long, value_enum)]
    output: Option<CliOutput>,

    /// Snapshot directory for PNG output
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Upscale factor for PNG output
    #[arg(long)]
    scale: Option<u32>,

    /// Held buttons, comma separated (left,right,up,down,a,b)
    #[arg(long, value_delimiter = ',')]
    hold: Vec<String>,

    /// List available scenes and exit
    #[arg(long)]
    list_scenes: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let config = Config::load(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                info!("Loaded configuration from: {}", path.display());
                config
            }
            None => Config::default(),
        };

        if let Some(scene) = &self.scene {
            config.scene = scene.clone();
        }
        if let Some(rate) = self.frame_rate {
            config.frame_rate = rate;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(output) = self.output {
            config.output.kind = output.into();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(scale) = self.scale {
            config.output.scale = scale;
        }
        if !self.hold.is_empty() {
            config.input.held = self.hold.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// What a finished run did.
#[derive(Debug)]
struct RunSummary {
    frames: u64,
    presented: u64,
    elapsed: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging. Terminal output owns stdout, so logs go to stderr.
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    if cli.list_scenes {
        for name in scenes::available_scenes() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = cli.resolve_config()?;

    if let Some(path) = &cli.dump_config {
        config.save(path)?;
        info!("Wrote configuration to: {}", path.display());
        return Ok(());
    }

    info!("Playing '{}' at {} fps", config.scene, config.frame_rate);

    let shutdown = Arc::new(AtomicBool::new(false));
    let render_shutdown = shutdown.clone();
    let mut render = tokio::task::spawn_blocking(move || render_loop(config, render_shutdown));

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    let joined = tokio::select! {
        result = &mut render => result,
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
            shutdown.store(true, Ordering::Relaxed);
            render.await
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
            shutdown.store(true, Ordering::Relaxed);
            render.await
        }
    };

    let summary = joined.context("Render task failed")??;
    info!(
        "Rendered {} frames ({} presented) in {:.1}s",
        summary.frames,
        summary.presented,
        summary.elapsed.as_secs_f32()
    );
    Ok(())
}

/// Drives the console until the frame limit or shutdown.
///
/// Runs on a blocking thread: idling sleeps, so shutdown is noticed within
/// one idle interval.
fn render_loop(config: Config, shutdown: Arc<AtomicBool>) -> Result<RunSummary> {
    let sink = sinks::create_sink(&config.output)?;
    play(&config, sink, shutdown)
}

/// Plays the configured scene into `sink`. The frame limit counts rendered
/// windows, presented or not.
fn play(
    config: &Config,
    sink: Box<dyn FrameSink>,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let held = config.input.buttons()?;
    let platform = HostPlatform::new(sink, held, config.idle_threshold_ms);
    let scheduler = FrameScheduler::new(config.frame_rate_u8())
        .with_idle_threshold(config.idle_threshold_ms);
    let mut console = Console::with_scheduler(platform, scheduler);
    let mut scene = scenes::create_scene(&config.scene)?;
    debug!("Scene '{}' ready", scene.name());

    let started = Instant::now();
    let mut rendered: u64 = 0;
    let mut consecutive_errors: u32 = 0;
    let mut last_error_log = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        if config.frames > 0 && rendered >= config.frames {
            break;
        }
        if !console.new_frame() {
            continue;
        }

        let buttons = console.platform().button_state();
        scene.update(console.frame_count(), buttons);
        let canvas = console.canvas_mut();
        canvas.clear();
        scene.render(canvas);
        rendered += 1;

        if let Err(e) = console.display() {
            consecutive_errors += 1;
            // Only log errors once per minute or on first error
            let elapsed = last_error_log.elapsed();
            if consecutive_errors == 1 || elapsed >= Duration::from_secs(60) {
                if consecutive_errors > 1 {
                    warn!(
                        "Present error (repeated {} times in {:?}): {}",
                        consecutive_errors, elapsed, e
                    );
                } else {
                    warn!("Present error: {}", e);
                }
                last_error_log = Instant::now();
                consecutive_errors = 0;
            }
        } else {
            consecutive_errors = 0;
        }

        if console.every_x_frames(config.frame_rate_u8()) {
            debug!(
                "Frame {}: cpu load {}%",
                console.frame_count(),
                console.cpu_load()
            );
        }
    }

    Ok(RunSummary {
        frames: rendered,
        presented: console.platform().presented(),
        elapsed: started.elapsed(),
    })
}
