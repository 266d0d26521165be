//! Wire messages exchanged with the gesture recognition service
//!
//! All requests are plain ASCII with a trailing NUL, sent as one frame each.

use std::time::Duration;

/// Protocol version token, without terminator
pub const PROTOCOL_VERSION: &str = "imuapi1.0";

/// Size of the buffer every response is received into
pub const RESPONSE_BUFFER_LEN: usize = 100;

/// How long the service keeps a detected gesture before superseding it.
///
/// Polling faster than this may return the same gesture twice; polling
/// slower may miss short gestures. The client does not enforce it.
pub const GESTURE_HOLD_TIME: Duration = Duration::from_millis(500);

/// A request sent from the client to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Version handshake, answered by the same token
    Handshake,
    /// Ask for the current gesture bitmask, answered by a single byte
    Detect,
    /// Release exclusive access; no answer
    Exit,
}

impl Request {
    /// The exact bytes written to the channel, terminator included
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Handshake => b"imuapi1.0\0",
            Self::Detect => b"apidetect\0",
            Self::Exit => b"apiexit\0",
        }
    }

    /// The request text without its terminator
    pub fn name(self) -> &'static str {
        match self {
            Self::Handshake => "imuapi1.0",
            Self::Detect => "apidetect",
            Self::Exit => "apiexit",
        }
    }
}

/// Strip everything from the first NUL onwards
fn until_nul(payload: &[u8]) -> &[u8] {
    match payload.iter().position(|&b| b == 0) {
        Some(end) => &payload[..end],
        None => payload,
    }
}

/// Check whether a handshake response acknowledges our protocol version.
///
/// The service echoes the NUL-terminated token; only the text before the
/// first NUL is compared, and an unterminated token is accepted as well.
pub fn is_handshake_ack(payload: &[u8]) -> bool {
    until_nul(payload) == PROTOCOL_VERSION.as_bytes()
}

/// Render a response payload for log and error messages
pub fn describe_payload(payload: &[u8]) -> String {
    let text = until_nul(payload);
    if !text.is_empty() && text.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        format!("{:?}", String::from_utf8_lossy(text))
    } else {
        format!("{} byte(s) {:02x?}", payload.len(), payload)
    }
}
