//! Gesture channel client implementation
//!
//! `GestureClient` owns at most one channel to the recognition service. The
//! session is active exactly while that channel is held: a successful
//! handshake stores it, and any failed transaction, `disconnect()` or drop
//! releases it. Nothing is retried; after a failure the caller must
//! `connect()` again.

use std::fmt;

use tracing::{debug, warn};

use crate::channel::{Channel, Connector};
use crate::error::{ChannelError, ErrorCode};
use crate::gesture::GestureFlags;
use crate::protocol::{self, Request, RESPONSE_BUFFER_LEN};
use crate::seqpacket::SeqPacketConnector;

/// Client for the gesture recognition service
///
/// The service grants exclusive access, so only one client per system can
/// be connected at a time. The client is not synchronized; drive it from a
/// single thread.
///
/// # Example
///
/// ```no_run
/// use gesture_mapper_client::{GestureClient, SeqPacketConnector};
///
/// let mut client = GestureClient::with_connector(SeqPacketConnector::new("/run/user/1000/wx-imu-api.sock"));
/// if client.connect().is_ok() {
///     match client.poll() {
///         Ok(flags) if flags.is_none() => println!("no gesture"),
///         Ok(flags) => println!("gesture: {}", flags),
///         Err(e) => eprintln!("internal api error: {}", e),
///     }
/// }
/// ```
pub struct GestureClient<C: Connector = SeqPacketConnector> {
    connector: C,
    channel: Option<C::Channel>,
    last_error: Option<ErrorCode>,
}

impl GestureClient<SeqPacketConnector> {
    /// Client for the default socket path (see [`default_socket_path`])
    ///
    /// [`default_socket_path`]: crate::default_socket_path
    pub fn new() -> Self {
        Self::with_connector(SeqPacketConnector::default())
    }
}

impl Default for GestureClient<SeqPacketConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> GestureClient<C> {
    /// Client that opens its channel through `connector`
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            channel: None,
            last_error: None,
        }
    }

    /// Whether a handshake succeeded and the channel is still usable
    pub fn is_active(&self) -> bool {
        self.channel.is_some()
    }

    /// Code of the most recent failure, if any operation has failed yet.
    ///
    /// Successful operations do not clear it.
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Endpoint the client connects to
    pub fn endpoint(&self) -> String {
        self.connector.endpoint()
    }

    /// Open the channel and perform the version handshake
    ///
    /// An already active session is disconnected first so its channel is not
    /// leaked.
    ///
    /// # Errors
    ///
    /// - `PipeOpenFailed` if the endpoint cannot be opened (service not
    ///   running, or another client holds exclusive access)
    /// - `MessageModeFailed` if message framing cannot be configured
    /// - `TransactionFailed` if the handshake cannot be sent or received
    /// - `ResponseMismatch` if the service answers with another version; the
    ///   exit message is sent before the channel is closed
    ///
    /// The session stays inactive on every error.
    pub fn connect(&mut self) -> Result<(), ChannelError> {
        if self.channel.is_some() {
            debug!("Gesture session already active, reconnecting");
            self.disconnect();
        }

        match self.handshake() {
            Ok(channel) => {
                debug!(endpoint = %self.connector.endpoint(), "Gesture session established");
                self.channel = Some(channel);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    fn handshake(&self) -> Result<C::Channel, ChannelError> {
        let mut channel = self
            .connector
            .open()
            .map_err(|source| ChannelError::PipeOpenFailed {
                endpoint: self.connector.endpoint(),
                source,
            })?;

        channel
            .set_message_mode()
            .map_err(ChannelError::MessageModeFailed)?;

        channel
            .send(Request::Handshake.as_bytes())
            .map_err(ChannelError::TransactionFailed)?;

        let mut buffer = [0u8; RESPONSE_BUFFER_LEN];
        let received = channel
            .recv(&mut buffer)
            .map_err(ChannelError::TransactionFailed)?;
        let response = &buffer[..received];

        if !protocol::is_handshake_ack(response) {
            // Release the service before hanging up; the channel closes on return.
            if let Err(e) = channel.send(Request::Exit.as_bytes()) {
                debug!("Failed to send exit after handshake mismatch: {}", e);
            }
            return Err(ChannelError::ResponseMismatch {
                request: Request::Handshake.name(),
                detail: format!(
                    "expected {:?}, got {}",
                    protocol::PROTOCOL_VERSION,
                    protocol::describe_payload(response)
                ),
            });
        }

        Ok(channel)
    }

    /// Ask the service for the current gesture
    ///
    /// Returns `GestureFlags::NONE` when nothing was detected. Detected
    /// gestures stay available on the service for about
    /// [`GESTURE_HOLD_TIME`](protocol::GESTURE_HOLD_TIME).
    ///
    /// # Errors
    ///
    /// - `NotInitialized` if there is no active session; the transport is not
    ///   touched
    /// - `TransactionFailed` if the request or response fails
    /// - `ResponseMismatch` if the response is not exactly one byte
    ///
    /// Transaction and mismatch errors close the channel and end the session.
    pub fn poll(&mut self) -> Result<GestureFlags, ChannelError> {
        let Some(channel) = self.channel.as_mut() else {
            return self.fail(ChannelError::NotInitialized);
        };

        match detect(channel) {
            Ok(flags) => Ok(flags),
            Err(e) => {
                self.channel = None;
                self.fail(e)
            }
        }
    }

    /// Release the service and close the channel
    ///
    /// The exit message is best effort; the channel is closed even if it
    /// cannot be sent. Does nothing without an active session, so it is safe
    /// to call repeatedly.
    pub fn disconnect(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.send(Request::Exit.as_bytes()) {
                debug!("Failed to send exit message, closing anyway: {}", e);
            }
            debug!(endpoint = %self.connector.endpoint(), "Gesture session closed");
        }
    }

    fn fail<T>(&mut self, error: ChannelError) -> Result<T, ChannelError> {
        warn!(code = %error.code(), "{}", error);
        self.last_error = Some(error.code());
        Err(error)
    }
}

fn detect<T: Channel>(channel: &mut T) -> Result<GestureFlags, ChannelError> {
    channel
        .send(Request::Detect.as_bytes())
        .map_err(ChannelError::TransactionFailed)?;

    let mut buffer = [0u8; RESPONSE_BUFFER_LEN];
    let received = channel
        .recv(&mut buffer)
        .map_err(ChannelError::TransactionFailed)?;

    if received != 1 {
        return Err(ChannelError::ResponseMismatch {
            request: Request::Detect.name(),
            detail: format!(
                "expected 1 byte, got {}",
                protocol::describe_payload(&buffer[..received])
            ),
        });
    }

    Ok(GestureFlags::from_bits(buffer[0]))
}

impl<C: Connector> Drop for GestureClient<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<C: Connector> fmt::Debug for GestureClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureClient")
            .field("endpoint", &self.connector.endpoint())
            .field("active", &self.is_active())
            .field("last_error", &self.last_error)
            .finish()
    }
}
