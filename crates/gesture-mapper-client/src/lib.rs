//! Client for the local IMU gesture recognition service
//!
//! The recognizer runs as a separate process and grants exclusive access to
//! one client at a time over a message-framed local channel. This crate
//! provides:
//! - `GestureClient`: handshake, gesture polling and teardown
//! - `GestureFlags` / `Motion`: decoding of the polled gesture bitmask
//! - `Gesture`: the higher-level gesture taxonomy (informational)
//!
//! ## Protocol
//!
//! Every message is NUL-terminated ASCII sent as a single frame:
//!
//! 1. Client sends `imuapi1.0`, service echoes `imuapi1.0`
//! 2. Client sends `apidetect`, service replies with one byte (the bitmask)
//! 3. Client sends `apiexit` to release the service
//!
//! ## Example
//!
//! ```no_run
//! use gesture_mapper_client::GestureClient;
//!
//! # fn main() -> Result<(), gesture_mapper_client::ChannelError> {
//! let mut client = GestureClient::new();
//! client.connect()?;
//! let flags = client.poll()?;
//! if flags.is_left() {
//!     println!("going left");
//! }
//! # Ok(())
//! # }
//! ```

mod channel;
mod client;
mod error;
mod gesture;
pub mod protocol;
mod seqpacket;
mod taxonomy;

pub use channel::{Channel, Connector};
pub use client::GestureClient;
pub use error::{ChannelError, ErrorCode};
pub use gesture::{GestureFlags, Motion, ParseMotionError};
pub use seqpacket::{default_socket_path, SeqPacketChannel, SeqPacketConnector, SOCKET_ENV};
pub use taxonomy::Gesture;
