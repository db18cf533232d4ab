//! Tello control-link library.
//!
//! Drives a DJI Tello quadcopter over its local UDP command channel:
//! packet framing, firmware checksums, per-command payload encoding,
//! and the continuously repeating virtual-stick heartbeat that keeps
//! the vehicle's control loop alive between discrete commands.
//!
//! The wire protocol is fire-and-forget — this crate never reads or
//! interprets inbound data, and it adds no acknowledgement tracking,
//! retransmission, or flow control on top of what the vehicle speaks.
//!
//! All protocol logic ([`protocol`]) is pure and host-testable; only
//! [`session`] touches the network, and it needs nothing beyond
//! `std::net`, so the crate runs anywhere `std` does, including
//! ESP-IDF targets.
//!
//! ```no_run
//! use std::thread;
//! use std::time::Duration;
//! use tellolink::{LinkConfig, Tello};
//!
//! # fn main() -> tellolink::Result<()> {
//! let drone = Tello::open(LinkConfig::default())?;
//! drone.take_off()?;
//! drone.forward(30);
//! thread::sleep(Duration::from_secs(2));
//! drone.forward(0);
//! drone.land()?;
//! # Ok(())
//! # }
//! ```

#![deny(unused_must_use)]

pub mod config;
pub mod protocol;
pub mod session;

mod error;

pub use config::LinkConfig;
pub use error::{Error, Result};
pub use protocol::command::FlipDirection;
pub use session::Tello;
