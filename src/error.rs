//! Link error types.
//!
//! The wire protocol is fire-and-forget: this layer never reads or
//! interprets inbound data, so the only observable failures are the
//! two I/O edges. A command the vehicle rejects is indistinguishable
//! from one it silently ignored; retry policy belongs to a supervisor
//! layered on top, never to this crate.

use std::fmt;
use std::io;

/// Every fallible operation on the link funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Address resolution, socket bind/connect, handshake send, or
    /// heartbeat spawn failed at session open. Fatal — the session was
    /// not created and no retry is attempted.
    Connect(io::Error),
    /// A single UDP datagram write failed.
    Send(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "session open failed: {e}"),
            Self::Send(e) => write!(f, "datagram send failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect(e) | Self::Send(e) => Some(e),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
