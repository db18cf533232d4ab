//! Command descriptors — the wire table as a closed enumeration.
//!
//! Every packet the link can emit is described by one [`Command`]
//! variant: its 16-bit command id, its packet-type byte, its payload
//! length, and whether it consumes the session sequence counter. The
//! encoders and the tests both read this table, so the wire format has
//! a single source of truth.

use core::fmt;

/// Non-payload bytes in every packet: start marker (1), length (2),
/// header checksum (1), packet type (1), command id (2), sequence (2),
/// trailer checksum (2). Total packet length is always payload + 11.
pub const FRAME_OVERHEAD: usize = 11;

/// Every packet kind the link emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Motor start and climb to hover.
    TakeOff,
    /// Controlled descent and motor stop.
    Land,
    /// Aerobatic flip in one of eight directions.
    Flip,
    /// Throw-and-go launch (motors spin up mid-air).
    ThrowTakeOff,
    /// Land on an open palm held under the vehicle.
    PalmLand,
    /// Ask the vehicle to start emitting the video stream (SPS/PPS).
    StartVideo,
    /// Virtual-stick heartbeat frame.
    Stick,
}

impl Command {
    /// 16-bit command id (packet bytes 5-6, little-endian).
    pub const fn id(self) -> u16 {
        match self {
            Self::StartVideo => 0x0025,
            Self::Stick => 0x0050,
            Self::TakeOff => 0x0054,
            Self::Land => 0x0055,
            Self::Flip => 0x005C,
            Self::ThrowTakeOff => 0x005D,
            Self::PalmLand => 0x005E,
        }
    }

    /// Packet-type byte (packet byte 4).
    pub const fn packet_type(self) -> u8 {
        match self {
            Self::TakeOff | Self::Land | Self::PalmLand => 0x68,
            Self::Flip => 0x70,
            Self::ThrowTakeOff => 0x48,
            Self::StartVideo | Self::Stick => 0x60,
        }
    }

    /// Payload byte count for this command.
    pub const fn payload_len(self) -> usize {
        match self {
            Self::TakeOff | Self::ThrowTakeOff | Self::StartVideo => 0,
            Self::Land | Self::Flip | Self::PalmLand => 1,
            Self::Stick => 11,
        }
    }

    /// Whether this command consumes the session sequence counter.
    /// Unnumbered commands carry a sequence field forced to zero.
    pub const fn numbered(self) -> bool {
        !matches!(self, Self::StartVideo | Self::Stick)
    }

    /// Total on-wire length of this command's packet.
    pub const fn frame_len(self) -> usize {
        self.payload_len() + FRAME_OVERHEAD
    }
}

/// Flip directions. The wire accepts exactly the codes 0-7; anything
/// else is unrepresentable through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlipDirection {
    Front = 0,
    Left = 1,
    Back = 2,
    Right = 3,
    ForwardLeft = 4,
    BackLeft = 5,
    BackRight = 6,
    ForwardRight = 7,
}

impl FlipDirection {
    /// Payload byte for the flip command.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Raw code outside the 0-7 flip range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFlipCode(pub u8);

impl fmt::Display for InvalidFlipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid flip direction code {} (valid: 0-7)", self.0)
    }
}

impl TryFrom<u8> for FlipDirection {
    type Error = InvalidFlipCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Front),
            1 => Ok(Self::Left),
            2 => Ok(Self::Back),
            3 => Ok(Self::Right),
            4 => Ok(Self::ForwardLeft),
            5 => Ok(Self::BackLeft),
            6 => Ok(Self::BackRight),
            7 => Ok(Self::ForwardRight),
            other => Err(InvalidFlipCode(other)),
        }
    }
}
