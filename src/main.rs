mod collectors;
mod config;
mod display;
mod monitor;
mod shutdown;

use clap::Parser;
use collectors::Host;
use config::Config;
use display::oled::Oled;
use display::Surface;
use monitor::{Monitor, Pacing};
use shutdown::ShutdownSignals;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "oledmon")]
#[command(version)]
struct Cli {
    /// YAML file overriding the built-in defaults.
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let cfg = match &cli.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(error = %err, "fatal error: failed to load configuration");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    info!(
        width = display::WIDTH,
        height = display::HEIGHT,
        bus = %cfg.display.i2c_bus,
        interval = %humantime::format_duration(cfg.interval()),
        "starting OLED monitor"
    );

    let signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(err) => {
            error!(error = %err, "fatal error: failed to install signal handlers");
            std::process::exit(1);
        }
    };

    let surface = match Oled::open(&cfg.display) {
        Ok(surface) => surface,
        Err(err) => {
            error!(error = %err, "fatal error: display unavailable");
            std::process::exit(1);
        }
    };

    let pacing = Pacing {
        interval: cfg.interval(),
        error_cooldown: cfg.error_cooldown(),
    };
    let mut monitor = Monitor::new(Host::new(&cfg), surface, pacing);
    monitor.run_until(signals.recv()).await;

    if let Err(err) = monitor.surface_mut().blank() {
        warn!(error = %err, "failed to blank display");
    }
    info!("exiting");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
