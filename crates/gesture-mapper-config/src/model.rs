//! Configuration data model

use std::path::PathBuf;
use std::time::Duration;

use gesture_mapper_client::Motion;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub global: GlobalConfig,
    /// Ordered gesture bindings; the first binding whose motion is detected wins
    pub bindings: Vec<GestureBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            bindings: default_bindings(),
        }
    }
}

/// Bindings used when the configuration has no `bindings` block.
///
/// Twists page forward, swipes move left and right.
pub fn default_bindings() -> Vec<GestureBinding> {
    vec![
        GestureBinding::new(Motion::Clockwise, "Up"),
        GestureBinding::new(Motion::CounterClockwise, "Up"),
        GestureBinding::new(Motion::Left, "Left"),
        GestureBinding::new(Motion::Right, "Right"),
    ]
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub log_level: LogLevel,
    /// Gesture service socket; `None` uses the client's default discovery
    pub socket_path: Option<PathBuf>,
    /// Pause between polls; zero polls back to back
    pub poll_interval: Duration,
    /// Name of the virtual keyboard created for key injection
    pub device_name: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            socket_path: None,
            poll_interval: Duration::ZERO,
            device_name: "gesture-mapper".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Tap `key` whenever `motion` is detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureBinding {
    pub motion: Motion,
    /// Key name as written in the config (resolved with `resolve_key`)
    pub key: String,
}

impl GestureBinding {
    pub fn new(motion: Motion, key: impl Into<String>) -> Self {
        Self {
            motion,
            key: key.into(),
        }
    }
}
