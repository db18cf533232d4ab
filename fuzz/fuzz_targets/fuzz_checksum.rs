//! Fuzz target: checksum engine
//!
//! The checksums must be pure functions of their input: no panics on
//! any byte sequence and identical output across repeated calls.
//!
//! cargo fuzz run fuzz_checksum

#![no_main]

use libfuzzer_sys::fuzz_target;
use tellolink::protocol::crc::{checksum8, checksum16};

fuzz_target!(|data: &[u8]| {
    assert_eq!(checksum8(data), checksum8(data));
    assert_eq!(checksum16(data), checksum16(data));
});
