//! Link configuration parameters
//!
//! Everything tunable about a control-link session: the remote command
//! endpoint, the three port numbers, and the heartbeat period. All of
//! it is supplied at session construction; nothing is read from the
//! environment or mutated afterwards.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control-link session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Remote command endpoint address. The vehicle's access point
    /// places it at 192.168.10.1.
    pub remote_addr: IpAddr,
    /// Remote command port.
    pub command_port: u16,
    /// Local response port to bind. Use 0 for an ephemeral port.
    pub local_port: u16,
    /// Video-stream port, echoed in the connection handshake. The
    /// command path never uses it directly.
    pub video_port: u16,
    /// Stick heartbeat period (milliseconds). The vehicle falls back
    /// to neutral if frames stop arriving; observed clients run
    /// anywhere from 20 to 100 ms. 50 ms balances link load against
    /// control latency.
    pub heartbeat_period_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            remote_addr: IpAddr::V4(Ipv4Addr::new(192, 168, 10, 1)),
            command_port: 8889,
            local_port: 8888,
            video_port: 11111,
            heartbeat_period_ms: 50,
        }
    }
}

impl LinkConfig {
    /// Heartbeat period as a [`Duration`].
    pub fn heartbeat_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.heartbeat_period_ms))
    }
}
