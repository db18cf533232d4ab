//! Fuzz target: `FrameBuffer::encode`
//!
//! Drives arbitrary command/sequence/payload combinations through the
//! frame builder and asserts that every emitted frame is structurally
//! valid: correct start marker, consistent length field, and both
//! checksums verifying over their exact coverage ranges.
//!
//! cargo fuzz run fuzz_frame_encode

#![no_main]

use libfuzzer_sys::fuzz_target;
use tellolink::protocol::command::Command;
use tellolink::protocol::crc::{checksum8, checksum16};
use tellolink::protocol::packet::FrameBuffer;

const ALL_COMMANDS: [Command; 7] = [
    Command::TakeOff,
    Command::Land,
    Command::Flip,
    Command::ThrowTakeOff,
    Command::PalmLand,
    Command::StartVideo,
    Command::Stick,
];

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let cmd = ALL_COMMANDS[usize::from(data[0]) % ALL_COMMANDS.len()];
    let seq = u16::from_le_bytes([data[1], data[2]]);

    // Take payload bytes from the input, zero-padding short inputs.
    let mut payload = [0u8; 11];
    for (dst, src) in payload.iter_mut().zip(data[3..].iter()) {
        *dst = *src;
    }
    let payload = &payload[..cmd.payload_len()];

    let mut fb = FrameBuffer::new();
    let frame = fb.encode(cmd, seq, payload);

    assert_eq!(frame.len(), cmd.frame_len());
    assert_eq!(frame[0], 0xCC);

    let shifted = u16::from_le_bytes([frame[1], frame[2]]);
    assert_eq!(usize::from(shifted >> 3), frame.len());

    assert_eq!(frame[3], checksum8(&frame[..3]));
    let trailer = u16::from_le_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    assert_eq!(trailer, checksum16(&frame[..frame.len() - 2]));
});
