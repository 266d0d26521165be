//! Unix seqpacket transport for the gesture channel
//!
//! `SOCK_SEQPACKET` sockets keep message boundaries intact, so each `send`
//! arrives as one message and each `recv` returns at most one message. A
//! response larger than the receive buffer is truncated to the buffer size.

use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::path::{Path, PathBuf};

use nix::sys::socket::{self, sockopt, AddressFamily, MsgFlags, SockFlag, SockType, UnixAddr};
use tracing::warn;

use crate::channel::{Channel, Connector};

/// Environment variable overriding the gesture service socket path
pub const SOCKET_ENV: &str = "GESTURE_SOCKET";

/// File name of the service socket inside the runtime directory
const SOCKET_FILE_NAME: &str = "wx-imu-api.sock";

/// Determine the well-known socket path of the gesture service
///
/// Resolution order:
/// 1. `$GESTURE_SOCKET`
/// 2. `$XDG_RUNTIME_DIR/wx-imu-api.sock`
/// 3. `/tmp/wx-imu-api-$UID.sock`
pub fn default_socket_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SOCKET_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    if let Some(runtime_dir) = std::env::var_os("XDG_RUNTIME_DIR").filter(|p| !p.is_empty()) {
        return PathBuf::from(runtime_dir).join(SOCKET_FILE_NAME);
    }

    warn!("XDG_RUNTIME_DIR not set, using fallback gesture socket path in /tmp");
    let uid = nix::unistd::getuid();
    PathBuf::from(format!("/tmp/wx-imu-api-{}.sock", uid))
}

/// Connects to the gesture service over a Unix seqpacket socket
#[derive(Debug, Clone)]
pub struct SeqPacketConnector {
    path: PathBuf,
}

impl SeqPacketConnector {
    /// Connector for an explicit socket path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The socket path this connector opens
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SeqPacketConnector {
    fn default() -> Self {
        Self::new(default_socket_path())
    }
}

impl Connector for SeqPacketConnector {
    type Channel = SeqPacketChannel;

    fn open(&self) -> io::Result<SeqPacketChannel> {
        let addr = UnixAddr::new(self.path.as_path())?;
        let fd = socket::socket(
            AddressFamily::Unix,
            SockType::SeqPacket,
            SockFlag::empty(),
            None,
        )?;
        socket::connect(fd.as_raw_fd(), &addr)?;
        Ok(SeqPacketChannel { fd })
    }

    fn endpoint(&self) -> String {
        self.path.display().to_string()
    }
}

/// An open seqpacket connection; the socket closes when this is dropped
#[derive(Debug)]
pub struct SeqPacketChannel {
    fd: OwnedFd,
}

impl SeqPacketChannel {
    /// Wrap an already connected socket
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

impl Channel for SeqPacketChannel {
    fn set_message_mode(&mut self) -> io::Result<()> {
        // Seqpacket sockets are always message-framed; make sure we really got one.
        let kind = socket::getsockopt(&self.fd, sockopt::SockType)?;
        if kind != SockType::SeqPacket {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("socket type {:?} does not preserve message boundaries", kind),
            ));
        }
        Ok(())
    }

    fn send(&mut self, message: &[u8]) -> io::Result<()> {
        let sent = socket::send(self.fd.as_raw_fd(), message, MsgFlags::MSG_NOSIGNAL)?;
        if sent != message.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, message.len()),
            ));
        }
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let received = socket::recv(self.fd.as_raw_fd(), buf, MsgFlags::empty())?;
        if received == 0 {
            // The service never sends empty messages; zero means it hung up.
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "gesture service closed the channel",
            ));
        }
        Ok(received)
    }
}
