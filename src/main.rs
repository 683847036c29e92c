//! Binary entrypoint: renders a carousel as log output and reads control
//! commands from stdin.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use slide_carousel::carousel::Carousel;
use slide_carousel::config::{Configuration, Variant};
use slide_carousel::events::Command;
use slide_carousel::schedule::VirtualScheduler;
use slide_carousel::simulate::{Simulation, parse_script};
use slide_carousel::surface::{LogSurface, Surface};
use slide_carousel::tasks::{input, runtime, timers::TokioScheduler};

#[derive(Debug, Parser)]
#[command(
    name = "slide-carousel",
    version,
    about = "Timed slide carousel with manual navigation and a fullscreen viewer"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the configured variant (full|minimal)
    #[arg(long, value_name = "VARIANT")]
    variant: Option<Variant>,

    /// Override the auto-play interval (e.g. 5s, 2500ms)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Run on virtual time for this long and exit instead of reading stdin
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    simulate: Option<Duration>,

    /// Timed commands for --simulate, one `<offset> <command>` per line
    #[arg(long, value_name = "FILE", requires = "simulate")]
    script: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!("slide_carousel={level}")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let Args {
        config,
        variant,
        interval,
        simulate,
        script,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?;
    if let Some(variant) = variant {
        cfg.variant = variant;
    }
    if let Some(interval) = interval {
        cfg.autoplay_interval = Some(interval);
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    info!(
        variant = %cfg.variant,
        features = ?cfg.features(),
        "loaded configuration from {}",
        config.display()
    );

    let deck = slide_carousel::load_deck(&cfg)?;
    let surface = Surface::for_features(cfg.features(), LogSurface);

    if let Some(horizon) = simulate {
        let steps = match script {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read script {}", path.display()))?;
                parse_script(&text).with_context(|| format!("invalid script {}", path.display()))?
            }
            None => Vec::new(),
        };
        let carousel = Carousel::new(deck, surface, VirtualScheduler::new(), cfg.settings());
        let mut sim = Simulation::start(carousel);
        sim.play(&steps, horizon);
        info!(
            at = %humantime::format_duration(sim.now()),
            slide = sim.carousel().index() + 1,
            name = %sim.carousel().current_slide().name,
            "simulation finished"
        );
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let result = rt.block_on(async move {
        let cancel = CancellationToken::new();
        let (scheduler, timer_rx) = TokioScheduler::new(cancel.child_token(), 16);
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(16);
        let carousel = Carousel::new(deck, surface, scheduler, cfg.settings());

        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("ctrl-c received; shutting down");
                        cancel.cancel();
                    }
                    Err(err) => warn!("failed to listen for ctrl-c: {err}"),
                }
            });
        }

        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let stdin = BufReader::new(tokio::io::stdin());
                if let Err(err) = input::run(stdin, cmd_tx, cancel).await {
                    warn!("control input failed: {err:#}");
                }
            });
        }

        let result = runtime::run(carousel, timer_rx, cmd_rx, cancel.clone()).await;
        cancel.cancel();
        result
    });
    // a pending stdin read parks a blocking thread until the next line
    rt.shutdown_timeout(Duration::from_millis(100));
    result
}
