//! Minimal flight demo: connect, take off, hover, land.
//!
//! Join the drone's Wi-Fi access point first, then:
//!
//! ```text
//! cargo run --features demos --bin takeoff
//! ```

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use tellolink::{LinkConfig, Tello};

fn main() -> Result<()> {
    env_logger::init();

    info!("connecting to drone");
    let drone = Tello::open(LinkConfig::default()).context("open control link")?;

    // Give the vehicle a moment to settle on the link.
    thread::sleep(Duration::from_secs(5));

    info!("taking off");
    drone.take_off().context("take off")?;

    thread::sleep(Duration::from_secs(5));

    info!("landing");
    drone.land().context("land")?;
    drone.close();

    Ok(())
}
