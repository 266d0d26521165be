//! gesture-mapper daemon
//!
//! Polls the gesture recognition service and taps keys for detected gestures.

mod dispatch;
mod injector;
mod poller;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gesture_mapper_client::{GestureClient, SeqPacketConnector};
use tracing_subscriber::EnvFilter;

use crate::dispatch::Dispatcher;
use crate::injector::VirtualKeyboard;
use crate::poller::StopFlag;

#[derive(Parser, Debug)]
#[command(name = "gesture-mapperd")]
#[command(about = "Gesture to keystroke mapping daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/gesture-mapper/config.kdl")]
    config: String,

    /// Gesture service socket (overrides config and environment)
    #[arg(short, long)]
    socket: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&args.config).into_owned().into();

    // A missing config file is fine: the defaults reproduce the clicker layout.
    let config = if config_path.exists() {
        gesture_mapper_config::parse_config(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        gesture_mapper_config::Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.global.log_level.as_str())),
        )
        .init();

    if config_path.exists() {
        tracing::info!("Loaded configuration from {}", config_path.display());
    } else {
        tracing::info!(
            "No configuration at {}, using default bindings",
            config_path.display()
        );
    }

    let dispatcher = Dispatcher::from_bindings(&config.bindings)?;
    tracing::info!("Loaded {} gesture binding(s)", dispatcher.binding_count());

    let mut keyboard = VirtualKeyboard::new(&config.global.device_name, dispatcher.keys())?;

    let socket_path = args
        .socket
        .or(config.global.socket_path)
        .unwrap_or_else(gesture_mapper_client::default_socket_path);
    let mut client = GestureClient::with_connector(SeqPacketConnector::new(socket_path));

    let stop = StopFlag::new();
    let worker_stop = stop.clone();
    let interval = config.global.poll_interval;

    tracing::info!("gesture-mapper daemon starting...");

    let mut worker = tokio::task::spawn_blocking(move || {
        poller::run(&mut client, &dispatcher, &mut keyboard, &worker_stop, interval)
    });

    let result = tokio::select! {
        joined = &mut worker => joined,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutting down...");
            stop.stop();
            worker.await
        }
    };

    result.context("Gesture worker panicked")?
}
