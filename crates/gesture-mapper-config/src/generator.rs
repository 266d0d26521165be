//! Render a configuration back to KDL
//!
//! Used to write a starter config file that documents every option.

use std::path::Path;

use crate::error::ConfigError;
use crate::model::Config;

/// Quote a string as a KDL string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Render `config` as a KDL document that `parse_config_str` reads back unchanged
pub fn render_config(config: &Config) -> String {
    let global = &config.global;
    let mut out = String::new();

    out.push_str("// gesture-mapper configuration\n\n");
    out.push_str("global {\n");
    out.push_str(&format!("    log-level {}\n", quote(global.log_level.as_str())));
    match &global.socket_path {
        Some(path) => out.push_str(&format!(
            "    socket-path {}\n",
            quote(&path.to_string_lossy())
        )),
        None => out.push_str(
            "    // socket-path \"/run/user/1000/wx-imu-api.sock\"  // default: $GESTURE_SOCKET or $XDG_RUNTIME_DIR\n",
        ),
    }
    out.push_str(&format!(
        "    poll-interval-ms {}\n",
        global.poll_interval.as_millis()
    ));
    out.push_str(&format!("    device-name {}\n", quote(&global.device_name)));
    out.push_str("}\n\n");

    out.push_str("// The first binding whose motion is detected wins; one key tap per poll.\n");
    out.push_str("bindings {\n");
    for binding in &config.bindings {
        out.push_str(&format!(
            "    {} {}\n",
            binding.motion.name(),
            quote(&binding.key)
        ));
    }
    out.push_str("}\n");

    out
}

/// Check that rendered KDL parses back before it is written anywhere
fn validate_kdl(content: &str) -> Result<(), ConfigError> {
    content
        .parse::<kdl::KdlDocument>()
        .map_err(|e| ConfigError::Invalid {
            message: format!("Rendered KDL is invalid: {}", e),
        })?;
    Ok(())
}

/// Render `config` and write it to `path`
///
/// Parent directories are created as needed. The content goes to a temp
/// file next to `path` and is renamed into place, so a failed write leaves
/// any existing file untouched.
pub fn write_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = render_config(config);
    validate_kdl(&content)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("kdl.tmp");
    if let Err(e) = std::fs::write(&temp_path, &content) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::info!("Wrote configuration to {}", path.display());
    Ok(())
}
