//! Configuration parsing for gesture-mapper
//!
//! This crate handles parsing KDL configuration files, resolving key names
//! to evdev keys, and rendering configurations back to KDL.

mod error;
mod generator;
mod keys;
mod model;
mod parser;

pub use error::ConfigError;
pub use generator::{render_config, write_config};
pub use keys::resolve_key;
pub use model::*;
pub use parser::{parse_config, parse_config_str};
