//! glmark2-native
//!
//! Opens the benchmark output window on X11 and keeps it up until Escape is
//! pressed or the window manager asks it to close.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use glmark2_native::config::{Config, DEFAULT_LOG_FILTER};
use glmark2_native::{NativeState, NativeStateX11, Options, WindowProperties, XConnection};

/// Time between two quit checks, roughly one frame at 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "glmark2-native", version, about = "X11 output window for the glmark2 benchmark")]
struct Cli {
    /// Window size as WIDTHxHEIGHT
    #[arg(short, long, value_parser = parse_size)]
    size: Option<(i32, i32)>,

    /// Cover the primary output
    #[arg(long)]
    fullscreen: bool,

    /// Visual id for the window, decimal or 0x-prefixed hex (default: root visual)
    #[arg(long, value_parser = parse_visual_id)]
    visual_id: Option<u32>,

    /// Window system options as name=value pairs separated by ':'
    #[arg(long)]
    winsys_options: Option<String>,
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (width, height) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = width.parse().map_err(|e| format!("invalid width '{width}': {e}"))?;
    let height = height.parse().map_err(|e| format!("invalid height '{height}': {e}"))?;
    Ok((width, height))
}

fn parse_visual_id(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid visual id '{s}': {e}"))
}

/// Filter directive in effect once the config is loaded; `RUST_LOG` wins
fn log_filter(rust_log: Option<&str>, config: &Config) -> String {
    rust_log.map_or_else(|| config.log.filter.clone(), str::to_string)
}

fn main() -> Result<()> {
    // Initialize logging, refiltered once the config is loaded
    let rust_log = std::env::var("RUST_LOG").ok();
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(
        rust_log.as_deref().unwrap_or(DEFAULT_LOG_FILTER),
    ));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The backend registers its winsys help before the command line is parsed
    let mut native = NativeStateX11::new(Options::default());
    let matches = Cli::command()
        .after_help(format!(
            "Window system options:\n{}",
            native.options().winsys_options_help
        ))
        .get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = Config::load().context("Failed to load configuration")?;
    if let Err(e) = filter_handle.reload(EnvFilter::new(log_filter(rust_log.as_deref(), &config))) {
        warn!("Failed to apply configured log filter: {}", e);
    }

    if let Some(list) = config.window.winsys_options.as_deref() {
        native.options_mut().parse_winsys_options(list);
    }
    if let Some(list) = cli.winsys_options.as_deref() {
        native.options_mut().parse_winsys_options(list);
    }

    if !native.init_display() {
        bail!("Failed to open X11 display");
    }

    let visual_id = match cli.visual_id {
        Some(id) => id,
        None => native
            .display()
            .map(XConnection::root_visual)
            .context("X11 display is not open")?,
    };
    let (width, height) = cli
        .size
        .unwrap_or((config.window.width, config.window.height));
    let requested = WindowProperties::new(
        width,
        height,
        cli.fullscreen || config.window.fullscreen,
        visual_id,
    );

    if !native.create_window(requested) {
        bail!("Failed to create output window");
    }

    let (window, actual) = native.window();
    info!(
        "Output window 0x{:x}: {}x{}, fullscreen={}, visual 0x{:x}",
        window.unwrap_or_default(),
        actual.width,
        actual.height,
        actual.fullscreen,
        actual.visual_id
    );

    native.visible(true);

    let start = Instant::now();
    let mut frames: u64 = 0;
    while !native.should_quit() {
        std::thread::sleep(FRAME_INTERVAL);
        frames += 1;
    }

    info!(
        "Quit requested after {} frames ({:.1}s)",
        frames,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
