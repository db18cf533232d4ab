//! Binary command protocol for the Tello control link.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Protocol Stack                          │
//! │                                                            │
//! │  ┌───────────┐   ┌───────────┐   ┌─────────────────────┐   │
//! │  │ Command   │──▶│  Packet   │──▶│  Session (send)     │   │
//! │  │ (table)   │   │ (framing) │   │  → UDP socket       │   │
//! │  └───────────┘   └───────────┘   └─────────────────────┘   │
//! │        ▲               ▲                                   │
//! │        │               │                                   │
//! │  ┌───────────┐   ┌───────────┐                             │
//! │  │  Stick    │   │   CRC     │   (heartbeat payload,      │
//! │  │ (packing) │   │ (engine)  │    integrity codes)        │
//! │  └───────────┘   └───────────┘                             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this module is pure: bytes in, bytes out, no I/O.
//! The [`session`](crate::session) module owns the socket.

pub mod command;
pub mod crc;
pub mod packet;
pub mod stick;

/// ASCII prefix of the connection handshake datagram.
pub const CONN_REQ: &[u8; 9] = b"conn_req:";

/// Build the connection handshake: `conn_req:` followed by the
/// video-stream port, little-endian. Sent once on the command channel
/// at session open.
pub fn connection_request(video_port: u16) -> [u8; 11] {
    let mut msg = [0u8; 11];
    msg[..9].copy_from_slice(CONN_REQ);
    msg[9..].copy_from_slice(&video_port.to_le_bytes());
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_request_encodes_video_port() {
        let msg = connection_request(11111);
        assert_eq!(&msg[..9], b"conn_req:");
        assert_eq!(u16::from_le_bytes([msg[9], msg[10]]), 11111);
    }
}
