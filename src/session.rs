//! Transport session — the UDP socket pair, the command encoders, and
//! the stick heartbeat thread.
//!
//! ```text
//!  caller threads                     heartbeat thread
//!  ─────────────                      ────────────────
//!  take_off / flip / ...              every tick
//!        │                                  │
//!        ▼                                  ▼
//!  ┌─────────────────────────────────────────────────┐
//!  │        Mutex<WireState>                         │
//!  │  frame buffer · sequence · axes · flying flag   │
//!  └───────────────────────┬─────────────────────────┘
//!                          │  (lock held across build-and-send)
//!                          ▼
//!                    UdpSocket::send
//! ```
//!
//! Both actors funnel through one lock held for the entire
//! build-and-send of a frame, so a datagram on the wire never
//! interleaves bytes from two logical frames. Sends are short,
//! non-blocking UDP writes; there is no queue, no backpressure, and no
//! retry at this layer.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::LinkConfig;
use crate::error::{Error, Result};
use crate::protocol::command::{Command, FlipDirection};
use crate::protocol::connection_request;
use crate::protocol::packet::FrameBuffer;
use crate::protocol::stick::{self, ClockStamp, StickState};

// ── Shared wire state ────────────────────────────────────────

/// Everything the two actors contend for, guarded as a single unit.
struct WireState {
    /// Reusable packet buffer; every encode rewrites it from byte 0.
    frame: FrameBuffer,
    /// Session sequence counter. Persists for the session's lifetime
    /// and wraps on 16-bit overflow; never reset.
    seq: u16,
    /// Live control-axis state read by the heartbeat on every tick.
    sticks: StickState,
    /// Whether the vehicle is believed airborne.
    flying: bool,
}

impl WireState {
    fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            seq: 0,
            sticks: StickState::default(),
            flying: false,
        }
    }
}

struct Shared {
    socket: UdpSocket,
    wire: Mutex<WireState>,
}

impl Shared {
    /// Acquire the wire lock. A poisoned lock only means a peer
    /// panicked mid-send; every encode rewrites the frame from byte 0,
    /// so the state stays structurally valid and we keep flying.
    fn lock_wire(&self) -> MutexGuard<'_, WireState> {
        self.wire.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build and send one discrete command frame under the wire lock.
    ///
    /// Numbered commands consume the sequence counter; unnumbered ones
    /// carry a sequence field forced to zero. `flying` updates the
    /// airborne flag once the datagram is on its way.
    fn send_command(&self, cmd: Command, payload: &[u8], flying: Option<bool>) -> Result<()> {
        let mut wire = self.lock_wire();
        let seq = if cmd.numbered() {
            wire.seq = wire.seq.wrapping_add(1);
            wire.seq
        } else {
            0
        };
        let frame = wire.frame.encode(cmd, seq, payload);
        self.socket.send(frame).map_err(Error::Send)?;
        if let Some(state) = flying {
            wire.flying = state;
        }
        Ok(())
    }

    /// Build and send one stick heartbeat frame under the wire lock.
    fn send_stick(&self) -> Result<()> {
        let mut wire = self.lock_wire();
        let payload = stick::encode_payload(&wire.sticks, ClockStamp::now());
        let frame = wire.frame.encode(Command::Stick, 0, &payload);
        self.socket.send(frame).map_err(Error::Send)?;
        Ok(())
    }
}

// ── Session ──────────────────────────────────────────────────

/// An active control-link session.
///
/// Created by [`Tello::open`]; dropped or [`close`](Tello::close)d to
/// disconnect. All methods take `&self` — the session is internally
/// synchronized and can be shared across threads.
pub struct Tello {
    shared: Arc<Shared>,
    /// Dropping this ends the heartbeat loop on its next wake.
    stop: Option<mpsc::Sender<()>>,
    heartbeat: Option<JoinHandle<()>>,
}

impl Tello {
    /// Open a session: bind the local response port, connect to the
    /// remote command endpoint, send the connection handshake, and
    /// start the stick heartbeat.
    ///
    /// Any failure here is fatal to session creation — no retry is
    /// attempted at this layer.
    pub fn open(config: LinkConfig) -> Result<Self> {
        let bind_addr: SocketAddr = match config.remote_addr {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, config.local_port).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, config.local_port).into(),
        };
        let socket = UdpSocket::bind(bind_addr).map_err(Error::Connect)?;
        socket
            .connect((config.remote_addr, config.command_port))
            .map_err(Error::Connect)?;
        socket
            .send(&connection_request(config.video_port))
            .map_err(Error::Connect)?;
        info!(
            "control link open: {}:{} (video port {})",
            config.remote_addr, config.command_port, config.video_port
        );

        let shared = Arc::new(Shared {
            socket,
            wire: Mutex::new(WireState::new()),
        });
        let (stop_tx, stop_rx) = mpsc::channel();
        let heartbeat = spawn_heartbeat(Arc::clone(&shared), stop_rx, config.heartbeat_period())?;

        Ok(Self {
            shared,
            stop: Some(stop_tx),
            heartbeat: Some(heartbeat),
        })
    }

    // ── Discrete commands ─────────────────────────────────────

    /// Spin up the motors and climb to hover.
    pub fn take_off(&self) -> Result<()> {
        info!("take off");
        self.shared.send_command(Command::TakeOff, &[], Some(true))
    }

    /// Descend and stop the motors.
    pub fn land(&self) -> Result<()> {
        info!("land");
        self.shared.send_command(Command::Land, &[0x00], Some(false))
    }

    /// Flip in the given direction.
    pub fn flip(&self, direction: FlipDirection) -> Result<()> {
        info!("flip {direction:?}");
        self.shared
            .send_command(Command::Flip, &[direction.code()], None)
    }

    /// Throw-and-go launch: the motors spin up while the vehicle is
    /// tossed gently into the air.
    pub fn throw_take_off(&self) -> Result<()> {
        info!("throw take off");
        self.shared
            .send_command(Command::ThrowTakeOff, &[], Some(true))
    }

    /// Land on an open palm held under the vehicle.
    pub fn palm_land(&self) -> Result<()> {
        info!("palm land");
        self.shared
            .send_command(Command::PalmLand, &[0x00], Some(false))
    }

    /// Ask the vehicle to start emitting the video stream.
    pub fn start_video(&self) -> Result<()> {
        self.shared.send_command(Command::StartVideo, &[], None)
    }

    /// Whether the vehicle is believed airborne (set by the take-off
    /// commands, cleared by the landing commands).
    pub fn is_flying(&self) -> bool {
        self.shared.lock_wire().flying
    }

    // ── Movement setters ──────────────────────────────────────
    //
    // Not wire commands: each overwrites one normalized axis that the
    // heartbeat reads on its next tick. `speed` is a 0-100 magnitude,
    // clamped; 0 stops motion on that axis. The vehicle keeps moving
    // in the last commanded direction until the axis is zeroed.

    /// Ascend at `speed` percent.
    pub fn up(&self, speed: i32) {
        self.shared.lock_wire().sticks.left_y = normalize(speed);
    }

    /// Descend at `speed` percent.
    pub fn down(&self, speed: i32) {
        self.shared.lock_wire().sticks.left_y = -normalize(speed);
    }

    /// Fly forward at `speed` percent.
    pub fn forward(&self, speed: i32) {
        self.shared.lock_wire().sticks.right_y = normalize(speed);
    }

    /// Fly backward at `speed` percent.
    pub fn backward(&self, speed: i32) {
        self.shared.lock_wire().sticks.right_y = -normalize(speed);
    }

    /// Strafe right at `speed` percent.
    pub fn right(&self, speed: i32) {
        self.shared.lock_wire().sticks.right_x = normalize(speed);
    }

    /// Strafe left at `speed` percent.
    pub fn left(&self, speed: i32) {
        self.shared.lock_wire().sticks.right_x = -normalize(speed);
    }

    /// Rotate clockwise at `speed` percent.
    pub fn clockwise(&self, speed: i32) {
        self.shared.lock_wire().sticks.left_x = normalize(speed);
    }

    /// Rotate counter-clockwise at `speed` percent.
    pub fn counter_clockwise(&self, speed: i32) {
        self.shared.lock_wire().sticks.left_x = -normalize(speed);
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Close the session: stop the heartbeat and release the socket.
    /// Dropping the session does the same.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.heartbeat.take() {
            if handle.join().is_err() {
                warn!("heartbeat thread panicked during shutdown");
            }
            info!("control link closed");
        }
    }
}

impl Drop for Tello {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map a 0-100 magnitude to a normalized axis value. Out-of-range
/// input is clamped, not rejected.
fn normalize(speed: i32) -> f32 {
    speed.clamp(0, 100) as f32 / 100.0
}

/// Spawn the heartbeat thread. Each tick builds and sends one stick
/// frame; a failed send is logged and the loop continues — the
/// heartbeat is best-effort and self-heals on the next tick.
///
/// The stop channel doubles as the tick timer: `recv_timeout` sleeps
/// for one period and wakes immediately when the session drops its
/// sender, so `close` never waits out a full period.
fn spawn_heartbeat(
    shared: Arc<Shared>,
    stop: mpsc::Receiver<()>,
    period: Duration,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tello-stick".into())
        .spawn(move || {
            debug!("heartbeat started ({} ms period)", period.as_millis());
            loop {
                if let Err(e) = shared.send_stick() {
                    warn!("stick frame send failed: {e}");
                }
                match stop.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("heartbeat stopped");
        })
        .map_err(Error::Connect)
}

// ── Test accessors ───────────────────────────────────────────

#[cfg(test)]
impl Tello {
    fn set_seq(&self, seq: u16) {
        self.shared.lock_wire().seq = seq;
    }

    fn stick_snapshot(&self) -> StickState {
        self.shared.lock_wire().sticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bind a loopback "drone" socket and a config pointing at it.
    /// The heartbeat period is an hour so unit tests only ever see the
    /// single tick fired at open, which they filter out by command id.
    fn fake_drone() -> (UdpSocket, LinkConfig) {
        let drone = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind fake drone");
        drone
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set timeout");
        let config = LinkConfig {
            remote_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            command_port: drone.local_addr().expect("local addr").port(),
            local_port: 0,
            heartbeat_period_ms: 3_600_000,
            ..LinkConfig::default()
        };
        (drone, config)
    }

    /// Receive datagrams until one carries the given command id,
    /// skipping handshake and stick frames.
    fn recv_command(drone: &UdpSocket, id: u16) -> Vec<u8> {
        let mut buf = [0u8; 64];
        loop {
            let (n, _) = drone.recv_from(&mut buf).expect("recv datagram");
            let datagram = &buf[..n];
            if datagram.starts_with(b"conn_req:") {
                continue;
            }
            if u16::from_le_bytes([datagram[5], datagram[6]]) == id {
                return datagram.to_vec();
            }
        }
    }

    #[test]
    fn sequence_increments_in_call_order() {
        let (drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.take_off().expect("take off");
        session.land().expect("land");

        let takeoff = recv_command(&drone, Command::TakeOff.id());
        assert_eq!(u16::from_le_bytes([takeoff[7], takeoff[8]]), 1);
        let land = recv_command(&drone, Command::Land.id());
        assert_eq!(u16::from_le_bytes([land[7], land[8]]), 2);
    }

    #[test]
    fn sequence_wraps_modulo_65536() {
        let (drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.set_seq(0xFFFE);
        session.take_off().expect("take off");
        session.take_off().expect("take off");

        let first = recv_command(&drone, Command::TakeOff.id());
        assert_eq!(u16::from_le_bytes([first[7], first[8]]), 0xFFFF);
        let second = recv_command(&drone, Command::TakeOff.id());
        assert_eq!(u16::from_le_bytes([second[7], second[8]]), 0);
    }

    #[test]
    fn start_video_sequence_is_forced_to_zero() {
        let (drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.take_off().expect("take off");
        session.start_video().expect("start video");
        session.take_off().expect("take off");

        let first = recv_command(&drone, Command::TakeOff.id());
        assert_eq!(u16::from_le_bytes([first[7], first[8]]), 1);
        let video = recv_command(&drone, Command::StartVideo.id());
        assert_eq!(u16::from_le_bytes([video[7], video[8]]), 0);
        // The unnumbered send must not have consumed the counter.
        let second = recv_command(&drone, Command::TakeOff.id());
        assert_eq!(u16::from_le_bytes([second[7], second[8]]), 2);
    }

    #[test]
    fn setters_overwrite_not_accumulate() {
        let (_drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.right(50);
        session.left(50);
        assert!((session.stick_snapshot().right_x - (-0.5)).abs() < f32::EPSILON);

        session.forward(30);
        session.forward(70);
        assert!((session.stick_snapshot().right_y - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn setters_clamp_out_of_range_input() {
        let (_drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.forward(150);
        assert!((session.stick_snapshot().right_y - 1.0).abs() < f32::EPSILON);

        session.up(-5);
        assert!(session.stick_snapshot().left_y.abs() < f32::EPSILON);
    }

    #[test]
    fn zero_speed_returns_axis_to_neutral() {
        let (_drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        session.clockwise(80);
        session.clockwise(0);
        assert!(session.stick_snapshot().left_x.abs() < f32::EPSILON);
    }

    #[test]
    fn flying_flag_tracks_takeoff_and_landing() {
        let (_drone, config) = fake_drone();
        let session = Tello::open(config).expect("open");

        assert!(!session.is_flying());
        session.take_off().expect("take off");
        assert!(session.is_flying());
        session.land().expect("land");
        assert!(!session.is_flying());

        session.throw_take_off().expect("throw take off");
        assert!(session.is_flying());
        session.palm_land().expect("palm land");
        assert!(!session.is_flying());
    }

    #[test]
    fn open_fails_on_unbindable_local_port() {
        // Claim a port, then ask the session to bind the same one.
        let holder = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).expect("bind holder");
        let config = LinkConfig {
            remote_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            local_port: holder.local_addr().expect("local addr").port(),
            ..LinkConfig::default()
        };
        let err = Tello::open(config).err().expect("open must fail");
        assert!(matches!(err, Error::Connect(_)), "got {err:?}");
    }
}
