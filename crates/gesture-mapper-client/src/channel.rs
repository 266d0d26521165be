//! Transport abstraction for the gesture channel
//!
//! The client only needs a message-framed duplex channel: one `send` writes
//! one whole message and one `recv` reads one whole message. Closing the
//! channel is tied to dropping the value, so a channel can never outlive
//! the client that owns it.

use std::io;

/// An open, exclusively owned channel to the recognition service
pub trait Channel {
    /// Configure the channel so reads and writes transfer whole messages
    fn set_message_mode(&mut self) -> io::Result<()>;

    /// Send one complete message
    fn send(&mut self, message: &[u8]) -> io::Result<()>;

    /// Receive one message into `buf`, returning the number of bytes transferred
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Opens channels to a well-known endpoint
pub trait Connector {
    type Channel: Channel;

    /// Open a new channel to the endpoint
    fn open(&self) -> io::Result<Self::Channel>;

    /// Human-readable endpoint name for logs and errors
    fn endpoint(&self) -> String;
}
