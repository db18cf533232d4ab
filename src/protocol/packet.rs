//! Packet builder — assembles complete wire frames into a reusable
//! fixed-capacity buffer.
//!
//! Wire format (all multi-byte fields little-endian):
//! ```text
//! ┌──────┬────────┬──────┬──────┬────────┬──────┬─────────┬────────┐
//! │ 0xCC │ len<<3 │ crc8 │ type │ cmd id │ seq  │ payload │ crc16  │
//! │  1B  │   2B   │  1B  │  1B  │   2B   │  2B  │  0-11B  │   2B   │
//! └──────┴────────┴──────┴──────┴────────┴──────┴─────────┴────────┘
//! ```
//!
//! The length field holds the *total* packet length (payload + 11)
//! shifted left 3 bits. The 8-bit checksum covers exactly the first
//! three bytes, before it is written; the 16-bit trailer checksum
//! covers every byte that precedes it, after all of them are written.
//!
//! Building a frame has no side effects beyond the buffer — sending is
//! the session's job.

use heapless::Vec;

use super::command::{Command, FRAME_OVERHEAD};
use super::crc::{checksum8, checksum16};

/// Start-of-packet marker, byte 0 of every frame.
pub const START_MARKER: u8 = 0xCC;

/// The longest frame the link emits (the 22-byte stick heartbeat).
pub const MAX_FRAME_LEN: usize = 22;

/// Reusable frame buffer. One lives inside the session's wire state;
/// every encode rewrites it from byte 0, so a frame slice is only valid
/// until the next encode.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: Vec<u8, MAX_FRAME_LEN>,
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Encode one complete frame and return the exact wire slice.
    ///
    /// `payload.len()` must equal the command's descriptor payload
    /// length; the descriptor table bounds every frame at
    /// [`MAX_FRAME_LEN`], so the buffer cannot overflow.
    pub fn encode(&mut self, cmd: Command, seq: u16, payload: &[u8]) -> &[u8] {
        debug_assert_eq!(payload.len(), cmd.payload_len());

        let total = payload.len() + FRAME_OVERHEAD;
        self.buf.clear();

        self.put(&[START_MARKER]);
        self.put(&((total as u16) << 3).to_le_bytes());
        let header_crc = checksum8(&self.buf);
        self.put(&[header_crc]);
        self.put(&[cmd.packet_type()]);
        self.put(&cmd.id().to_le_bytes());
        self.put(&seq.to_le_bytes());
        self.put(payload);
        let trailer_crc = checksum16(&self.buf);
        self.put(&trailer_crc.to_le_bytes());

        debug_assert_eq!(self.buf.len(), total);
        &self.buf
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf
            .extend_from_slice(bytes)
            .expect("descriptor table bounds every frame at MAX_FRAME_LEN");
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
