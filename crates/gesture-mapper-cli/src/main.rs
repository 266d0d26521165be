//! gesture-mapper CLI
//!
//! Inspection and configuration tool for gesture-mapper.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gesture_mapper_client::{
    protocol, Gesture, GestureClient, GestureFlags, Motion, SeqPacketConnector,
};
use miette::IntoDiagnostic;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "gesture-mapper")]
#[command(about = "Gesture recognition client and keystroke mapper")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/gesture-mapper/config.kdl")]
    config: String,

    /// Gesture service socket (overrides config and environment)
    #[arg(short, long)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration file
    Validate,

    /// Write a configuration file with the default bindings
    Init {
        /// Output path (overrides --config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Connect to the gesture service, handshake and disconnect
    Probe,

    /// Print detected gestures as they arrive
    Watch {
        /// Stop after this many gestures
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Emit one JSON object per gesture
        #[arg(long)]
        json: bool,
    },

    /// Decode a gesture code (decimal or 0x-prefixed hex)
    Decode {
        #[arg(value_parser = parse_code)]
        code: u8,
    },

    /// List gesture bits and the gesture taxonomy
    Gestures,
}

/// One detected gesture, as printed by `watch --json`
#[derive(Debug, Serialize)]
struct GestureEvent {
    code: u8,
    motions: Vec<&'static str>,
}

impl From<GestureFlags> for GestureEvent {
    fn from(flags: GestureFlags) -> Self {
        Self {
            code: flags.bits(),
            motions: flags.motions().map(Motion::name).collect(),
        }
    }
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&cli.config).into_owned().into();

    match cli.command {
        Commands::Validate => cmd_validate(&config_path),
        Commands::Init { output, force } => {
            cmd_init(output.as_deref().unwrap_or(&config_path), force)
        }
        Commands::Probe => cmd_probe(&config_path, cli.socket),
        Commands::Watch { count, json } => cmd_watch(&config_path, cli.socket, count, json),
        Commands::Decode { code } => cmd_decode(code),
        Commands::Gestures => cmd_gestures(),
    }
}

fn parse_code(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("`{}` is not a gesture code between 0 and 255", s))
}

fn cmd_validate(config_path: &Path) -> miette::Result<()> {
    println!("Validating configuration: {}", config_path.display());

    let config = gesture_mapper_config::parse_config(config_path)?;

    println!("Configuration is valid!");
    println!("  Log level: {}", config.global.log_level.as_str());
    match &config.global.socket_path {
        Some(path) => println!("  Socket: {}", path.display()),
        None => println!(
            "  Socket: {} (default)",
            gesture_mapper_client::default_socket_path().display()
        ),
    }
    println!("  Poll interval: {:?}", config.global.poll_interval);
    println!("  Bindings: {}", config.bindings.len());
    for binding in &config.bindings {
        println!("    - {} -> {}", binding.motion, binding.key);
    }
    Ok(())
}

fn cmd_init(output: &Path, force: bool) -> miette::Result<()> {
    if output.exists() && !force {
        return Err(miette::miette!(
            help = "pass --force to overwrite it",
            "{} already exists",
            output.display()
        ));
    }

    if output.exists() {
        tracing::warn!("Overwriting existing configuration at {}", output.display());
    }
    gesture_mapper_config::write_config(&gesture_mapper_config::Config::default(), output)?;

    println!("Wrote default configuration: {}", output.display());
    Ok(())
}

/// Build a client from --socket, the config file, or the default path
fn make_client(
    config_path: &Path,
    socket: Option<PathBuf>,
) -> miette::Result<GestureClient<SeqPacketConnector>> {
    let configured = if socket.is_none() && config_path.exists() {
        gesture_mapper_config::parse_config(config_path)?
            .global
            .socket_path
    } else {
        None
    };

    let path = socket
        .or(configured)
        .unwrap_or_else(gesture_mapper_client::default_socket_path);
    tracing::debug!("Using gesture service socket {}", path.display());
    Ok(GestureClient::with_connector(SeqPacketConnector::new(path)))
}

fn cmd_probe(config_path: &Path, socket: Option<PathBuf>) -> miette::Result<()> {
    let mut client = make_client(config_path, socket)?;
    println!("Connecting to {}", client.endpoint());

    if let Err(e) = client.connect() {
        tracing::warn!(code = %e.code(), "Gesture service handshake failed");
        return Err(e).into_diagnostic();
    }
    println!("Handshake OK (protocol {})", protocol::PROTOCOL_VERSION);

    client.disconnect();
    println!("Released gesture service");
    Ok(())
}

fn cmd_watch(
    config_path: &Path,
    socket: Option<PathBuf>,
    count: Option<usize>,
    json: bool,
) -> miette::Result<()> {
    let mut client = make_client(config_path, socket)?;
    if let Err(e) = client.connect() {
        tracing::warn!(code = %e.code(), "Cannot connect to gesture service at {}", client.endpoint());
        return Err(e).into_diagnostic();
    }
    if !json {
        println!("connected to {} (Ctrl-C to stop)", client.endpoint());
    }

    let mut seen = 0;
    while count.map_or(true, |limit| seen < limit) {
        let flags = match client.poll() {
            Ok(flags) => flags,
            Err(e) => {
                tracing::warn!(code = %e.code(), "Internal gesture API error after {} gesture(s)", seen);
                return Err(e).into_diagnostic();
            }
        };
        if flags.is_none() {
            continue;
        }
        seen += 1;

        if json {
            let line = serde_json::to_string(&GestureEvent::from(flags)).into_diagnostic()?;
            println!("{}", line);
        } else {
            println!("{:#04x}  {}", flags.bits(), flags);
        }
    }

    Ok(())
}

fn cmd_decode(code: u8) -> miette::Result<()> {
    let flags = GestureFlags::from_bits(code);
    println!("{:#04x} ({}): {}", code, code, flags);
    for motion in Motion::ALL {
        let mark = if flags.contains(motion) { "x" } else { " " };
        println!("  [{}] {:#04x} {}", mark, motion.mask(), motion);
    }
    Ok(())
}

fn cmd_gestures() -> miette::Result<()> {
    println!("Gesture bits (reported by the service):");
    for motion in Motion::ALL {
        println!("  {:#04x}  {}", motion.mask(), motion);
    }

    println!();
    println!("Gesture taxonomy (documentation only, never reported by a poll):");
    for gesture in Gesture::ALL {
        println!(
            "  {:>2}  {:<17} {}",
            gesture.number(),
            gesture.name(),
            gesture.description()
        );
    }
    Ok(())
}
