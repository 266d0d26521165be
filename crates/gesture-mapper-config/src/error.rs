use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to parse KDL")]
    #[diagnostic(code(gesture_mapper::config::parse_error))]
    ParseError {
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Unknown motion `{name}`")]
    #[diagnostic(
        code(gesture_mapper::config::unknown_motion),
        help("valid motions: backward, forward, right, left, down, up, clockwise, counterclockwise")
    )]
    UnknownMotion {
        name: String,
        #[source_code]
        src: String,
        #[label("not a motion")]
        span: miette::SourceSpan,
    },

    #[error("Unknown key `{key}` bound to {motion}")]
    #[diagnostic(
        code(gesture_mapper::config::unknown_key),
        help("use a key name such as \"Left\", \"PageDown\", \"Space\" or a raw evdev name like \"KEY_F5\"")
    )]
    UnknownKey {
        key: String,
        motion: String,
        #[source_code]
        src: String,
        #[label("unknown key")]
        span: miette::SourceSpan,
    },

    #[error("Motion `{motion}` is bound more than once")]
    #[diagnostic(code(gesture_mapper::config::duplicate_binding))]
    DuplicateBinding {
        motion: String,
        #[source_code]
        src: String,
        #[label("duplicate binding")]
        span: miette::SourceSpan,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(gesture_mapper::config::invalid))]
    Invalid { message: String },

    #[error("Missing value for {field}")]
    #[diagnostic(code(gesture_mapper::config::missing_value))]
    MissingValue { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
