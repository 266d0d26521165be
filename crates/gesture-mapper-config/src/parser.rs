//! KDL configuration parser

use std::path::Path;
use std::time::Duration;

use gesture_mapper_client::Motion;

use crate::error::ConfigError;
use crate::keys::resolve_key;
use crate::model::*;

// kdl carries an older miette, so spans are rebuilt from offset/len.
fn node_span(node: &kdl::KdlNode) -> miette::SourceSpan {
    let span = node.name().span();
    miette::SourceSpan::from((span.offset(), span.len()))
}

fn entry_span(entry: &kdl::KdlEntry) -> miette::SourceSpan {
    let span = entry.span();
    miette::SourceSpan::from((span.offset(), span.len()))
}

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        let span = miette::SourceSpan::from((e.span.offset(), e.span.len()));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut global = GlobalConfig::default();
    let mut bindings = None;

    for node in doc.nodes() {
        match node.name().value() {
            "global" => {
                global = parse_global(node)?;
            }
            "bindings" => {
                bindings = Some(parse_bindings(node, content)?);
            }
            name => {
                tracing::warn!("Unknown top-level node: {}", name);
            }
        }
    }

    Ok(Config {
        global,
        bindings: bindings.unwrap_or_else(default_bindings),
    })
}

fn first_string<'a>(node: &'a kdl::KdlNode, field: &str) -> Result<&'a str, ConfigError> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| ConfigError::MissingValue {
            field: field.to_string(),
        })
}

fn parse_global(node: &kdl::KdlNode) -> Result<GlobalConfig, ConfigError> {
    let mut global = GlobalConfig::default();

    let Some(children) = node.children() else {
        return Ok(global);
    };

    for child in children.nodes() {
        match child.name().value() {
            "log-level" => {
                let val = first_string(child, "log-level")?;
                global.log_level = val
                    .parse()
                    .map_err(|message| ConfigError::Invalid { message })?;
            }
            "socket-path" => {
                let val = first_string(child, "socket-path")?;
                global.socket_path = Some(shellexpand::tilde(val).into_owned().into());
            }
            "poll-interval-ms" => {
                let ms = child
                    .entries()
                    .first()
                    .and_then(|e| e.value().as_i64())
                    .ok_or_else(|| ConfigError::MissingValue {
                        field: "poll-interval-ms".to_string(),
                    })?;
                let ms = u64::try_from(ms).map_err(|_| ConfigError::Invalid {
                    message: format!("poll-interval-ms must not be negative (got {})", ms),
                })?;
                global.poll_interval = Duration::from_millis(ms);
            }
            "device-name" => {
                let val = first_string(child, "device-name")?;
                if val.trim().is_empty() {
                    return Err(ConfigError::Invalid {
                        message: "device-name must not be empty".to_string(),
                    });
                }
                global.device_name = val.to_string();
            }
            name => {
                tracing::warn!("Unknown global config option: {}", name);
            }
        }
    }

    Ok(global)
}

/// Parse `bindings { <motion> "<key>" ... }`, keeping document order
fn parse_bindings(node: &kdl::KdlNode, source: &str) -> Result<Vec<GestureBinding>, ConfigError> {
    let mut bindings: Vec<GestureBinding> = Vec::new();

    let Some(children) = node.children() else {
        return Ok(bindings);
    };

    for child in children.nodes() {
        let name = child.name().value();
        let motion: Motion = name.parse().map_err(|_| ConfigError::UnknownMotion {
            name: name.to_string(),
            src: source.to_string(),
            span: node_span(child),
        })?;

        if bindings.iter().any(|b| b.motion == motion) {
            return Err(ConfigError::DuplicateBinding {
                motion: motion.name().to_string(),
                src: source.to_string(),
                span: node_span(child),
            });
        }

        let entry = child.entries().first().ok_or_else(|| ConfigError::MissingValue {
            field: format!("key for `{}` binding", name),
        })?;
        let key = entry
            .value()
            .as_string()
            .ok_or_else(|| ConfigError::MissingValue {
                field: format!("key for `{}` binding", name),
            })?;

        if resolve_key(key).is_none() {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
                motion: motion.name().to_string(),
                src: source.to_string(),
                span: entry_span(entry),
            });
        }

        bindings.push(GestureBinding::new(motion, key));
    }

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_config() {
        let config = r#"
            global {
                log-level "debug"
                socket-path "/run/user/1000/wx-imu-api.sock"
                poll-interval-ms 50
                device-name "clicker"
            }

            bindings {
                clockwise "PageDown"
                left "Left"
            }
        "#;

        let result = parse_config_str(config).unwrap();
        assert_eq!(result.global.log_level, LogLevel::Debug);
        assert_eq!(
            result.global.socket_path,
            Some("/run/user/1000/wx-imu-api.sock".into())
        );
        assert_eq!(result.global.poll_interval, Duration::from_millis(50));
        assert_eq!(result.global.device_name, "clicker");
        assert_eq!(
            result.bindings,
            vec![
                GestureBinding::new(Motion::Clockwise, "PageDown"),
                GestureBinding::new(Motion::Left, "Left"),
            ]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let result = parse_config_str("").unwrap();
        assert_eq!(result, Config::default());
        assert_eq!(result.global.socket_path, None);
        assert_eq!(result.global.poll_interval, Duration::ZERO);
    }

    #[test]
    fn test_default_bindings_match_clicker_layout() {
        let result = parse_config_str("global { log-level \"warn\"; }").unwrap();
        assert_eq!(result.global.log_level, LogLevel::Warn);
        let motions: Vec<Motion> = result.bindings.iter().map(|b| b.motion).collect();
        assert_eq!(
            motions,
            vec![
                Motion::Clockwise,
                Motion::CounterClockwise,
                Motion::Left,
                Motion::Right
            ]
        );
        assert_eq!(result.bindings[0].key, "Up");
        assert_eq!(result.bindings[2].key, "Left");
        assert_eq!(result.bindings[3].key, "Right");
    }

    #[test]
    fn test_empty_bindings_block_disables_defaults() {
        let result = parse_config_str("bindings {\n}\n").unwrap();
        assert!(result.bindings.is_empty());
    }

    #[test]
    fn test_binding_order_preserved() {
        let config = r#"
            bindings {
                up "Up"
                down "Down"
                forward "Space"
                backward "BackSpace"
            }
        "#;

        let result = parse_config_str(config).unwrap();
        let motions: Vec<Motion> = result.bindings.iter().map(|b| b.motion).collect();
        assert_eq!(
            motions,
            vec![Motion::Up, Motion::Down, Motion::Forward, Motion::Backward]
        );
    }

    #[test]
    fn test_motion_aliases_accepted() {
        let config = r#"
            bindings {
                counter-clockwise "PageUp"
                push "KEY_F5"
            }
        "#;

        let result = parse_config_str(config).unwrap();
        assert_eq!(result.bindings[0].motion, Motion::CounterClockwise);
        assert_eq!(result.bindings[1].motion, Motion::Forward);
    }

    #[test]
    fn test_unknown_motion_fails() {
        let config = r#"
            bindings {
                sideways "Left"
            }
        "#;

        let err = parse_config_str(config).unwrap_err();
        match err {
            ConfigError::UnknownMotion { name, .. } => assert_eq!(name, "sideways"),
            _ => panic!("Expected UnknownMotion error, got: {:?}", err),
        }
    }

    #[test]
    fn test_unknown_key_fails() {
        let config = r#"
            bindings {
                left "NotAKey"
            }
        "#;

        let err = parse_config_str(config).unwrap_err();
        match err {
            ConfigError::UnknownKey { key, motion, .. } => {
                assert_eq!(key, "NotAKey");
                assert_eq!(motion, "left");
            }
            _ => panic!("Expected UnknownKey error, got: {:?}", err),
        }
    }

    #[test]
    fn test_duplicate_binding_fails() {
        let config = r#"
            bindings {
                left "Left"
                cw "Up"
                clockwise "PageDown"
            }
        "#;

        let err = parse_config_str(config).unwrap_err();
        match err {
            ConfigError::DuplicateBinding { motion, .. } => assert_eq!(motion, "clockwise"),
            _ => panic!("Expected DuplicateBinding error, got: {:?}", err),
        }
    }

    #[test]
    fn test_binding_without_key_fails() {
        let config = r#"
            bindings {
                left
            }
        "#;

        let err = parse_config_str(config).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingValue { ref field } if field.contains("left")),
            "Expected MissingValue error, got: {:?}",
            err
        );
    }

    #[test]
    fn test_negative_poll_interval_fails() {
        let config = r#"
            global {
                poll-interval-ms -5
            }
        "#;

        let err = parse_config_str(config).unwrap_err();
        match err {
            ConfigError::Invalid { message } => assert!(message.contains("poll-interval-ms")),
            _ => panic!("Expected Invalid error, got: {:?}", err),
        }
    }

    #[test]
    fn test_invalid_log_level_fails() {
        let err = parse_config_str("global { log-level \"loud\"; }").unwrap_err();
        match err {
            ConfigError::Invalid { message } => assert!(message.contains("loud")),
            _ => panic!("Expected Invalid error, got: {:?}", err),
        }
    }

    #[test]
    fn test_kdl_syntax_error() {
        let err = parse_config_str("bindings {\n    left \"Left\"\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::ParseError { .. }),
            "Expected ParseError, got: {:?}",
            err
        );
    }

    #[test]
    fn test_tilde_expansion_in_socket_path() {
        let config = r#"
            global {
                socket-path "~/.local/run/wx-imu-api.sock"
            }
        "#;

        let result = parse_config_str(config).unwrap();
        let path = result.global.socket_path.expect("socket path should be set");
        let path_str = path.to_string_lossy();

        assert!(
            !path_str.starts_with('~'),
            "Tilde should be expanded, but got: {}",
            path_str
        );
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        assert!(path_str.starts_with(&home));
        assert!(path_str.ends_with("/.local/run/wx-imu-api.sock"));
    }

    #[test]
    fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/gesture-mapper/config.kdl")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
