//! Error types for gesture channel operations

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the gesture recognition service
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel endpoint could not be opened.
    ///
    /// Usually another application already holds exclusive access, or the
    /// recognizer is not running.
    #[error("Failed to open gesture channel at {endpoint}: {source}")]
    PipeOpenFailed {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The channel could not be switched to message framing
    #[error("Failed to set gesture channel to message mode: {0}")]
    MessageModeFailed(#[source] std::io::Error),

    /// Sending a request or receiving a response failed
    #[error("Gesture channel transaction failed: {0}")]
    TransactionFailed(#[source] std::io::Error),

    /// The service answered with something other than what the protocol expects
    #[error("Unexpected response to {request}: {detail}")]
    ResponseMismatch {
        request: &'static str,
        detail: String,
    },

    /// An operation that needs a live session was called without one
    #[error("Gesture client is not connected - call connect() first")]
    NotInitialized,
}

impl ChannelError {
    /// The last-error code this error is recorded as
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PipeOpenFailed { .. } => ErrorCode::PipeOpenFailed,
            Self::MessageModeFailed(_) => ErrorCode::MessageModeFailed,
            Self::TransactionFailed(_) => ErrorCode::TransactionFailed,
            Self::ResponseMismatch { .. } => ErrorCode::ResponseMismatch,
            Self::NotInitialized => ErrorCode::NotInitialized,
        }
    }
}

/// Flat error code kept by the client for the most recent failure.
///
/// The numeric values match the codes the recognizer's reference client
/// reports, so they can be compared against service-side logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    PipeOpenFailed = 1,
    MessageModeFailed = 2,
    TransactionFailed = 3,
    ResponseMismatch = 4,
    NotInitialized = 5,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PipeOpenFailed => "pipe open failed",
            Self::MessageModeFailed => "message mode failed",
            Self::TransactionFailed => "transaction failed",
            Self::ResponseMismatch => "response mismatch",
            Self::NotInitialized => "not initialized",
        };
        write!(f, "{} ({})", name, self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_reference_values() {
        assert_eq!(ErrorCode::PipeOpenFailed.as_u16(), 1);
        assert_eq!(ErrorCode::MessageModeFailed.as_u16(), 2);
        assert_eq!(ErrorCode::TransactionFailed.as_u16(), 3);
        assert_eq!(ErrorCode::ResponseMismatch.as_u16(), 4);
        assert_eq!(ErrorCode::NotInitialized.as_u16(), 5);
    }

    #[test]
    fn test_channel_error_maps_to_code() {
        let err = ChannelError::TransactionFailed(std::io::Error::from(
            std::io::ErrorKind::BrokenPipe,
        ));
        assert_eq!(err.code(), ErrorCode::TransactionFailed);

        let err = ChannelError::ResponseMismatch {
            request: "apidetect",
            detail: "expected 1 byte, got 2".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::ResponseMismatch);
        assert!(err.to_string().contains("apidetect"));
    }

    #[test]
    fn test_open_failure_message_names_endpoint() {
        let err = ChannelError::PipeOpenFailed {
            endpoint: "/tmp/wx-imu-api.sock".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/tmp/wx-imu-api.sock"));
        assert_eq!(err.code(), ErrorCode::PipeOpenFailed);
    }
}
