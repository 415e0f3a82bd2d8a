//! UDP driver for Tello-dialect drones.
//!
//! The drone speaks a plain-text command protocol over UDP and answers
//! `ok` or `error ...` from the same address. Control commands block until
//! acknowledged; `rc` channel updates are fire-and-forget by design.

use crate::actuator::Actuator;
use anyhow::{bail, Context, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelloActuator {
    socket: UdpSocket,
    addr: SocketAddr,
}

impl TelloActuator {
    /// Bind a local socket and switch the drone into SDK command mode.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let addr = addr
            .to_socket_addrs()
            .context("resolving drone address")?
            .next()
            .context("drone address resolved to nothing")?;
        let socket = UdpSocket::bind("0.0.0.0:0").context("binding local UDP socket")?;
        socket.set_read_timeout(Some(RESPONSE_TIMEOUT))?;

        let mut driver = Self { socket, addr };
        driver.command("command")?;
        Ok(driver)
    }

    /// Send one command and wait for its acknowledgement.
    fn command(&mut self, cmd: &str) -> Result<()> {
        tracing::debug!(%cmd, "drone command");
        self.socket
            .send_to(cmd.as_bytes(), self.addr)
            .with_context(|| format!("sending {cmd:?}"))?;

        let mut buf = [0u8; 1024];
        let (len, _) = self
            .socket
            .recv_from(&mut buf)
            .with_context(|| format!("waiting for response to {cmd:?}"))?;
        let response = String::from_utf8_lossy(&buf[..len]).trim().to_string();
        if !response.eq_ignore_ascii_case("ok") {
            bail!("drone rejected {cmd:?}: {response}");
        }
        Ok(())
    }

    /// Channel update; the drone does not acknowledge `rc`.
    fn send_rc(&mut self, cmd: &str) -> Result<()> {
        tracing::trace!(%cmd, "drone rc update");
        self.socket
            .send_to(cmd.as_bytes(), self.addr)
            .with_context(|| format!("sending {cmd:?}"))?;
        Ok(())
    }
}

/// The wire protocol takes whole degrees.
fn centidegrees_to_wire(centidegrees: i32) -> i32 {
    ((centidegrees as f64) / 100.0).round() as i32
}

/// `rc` channel order is left/right, forward/back, up/down, yaw, each
/// clamped to the protocol's ±100 range.
fn rc_command(forward_back: i32, left_right: i32, up_down: i32, yaw: i32) -> String {
    format!(
        "rc {} {} {} {}",
        left_right.clamp(-100, 100),
        forward_back.clamp(-100, 100),
        up_down.clamp(-100, 100),
        yaw.clamp(-100, 100),
    )
}

impl Actuator for TelloActuator {
    fn takeoff(&mut self) -> Result<()> {
        self.command("takeoff")
    }

    fn land(&mut self) -> Result<()> {
        self.command("land")
    }

    fn rotate_clockwise(&mut self, centidegrees: i32) -> Result<()> {
        let degrees = centidegrees_to_wire(centidegrees);
        if degrees == 0 {
            return Ok(());
        }
        self.command(&format!("cw {degrees}"))
    }

    fn rotate_counter_clockwise(&mut self, centidegrees: i32) -> Result<()> {
        let degrees = centidegrees_to_wire(centidegrees);
        if degrees == 0 {
            return Ok(());
        }
        self.command(&format!("ccw {degrees}"))
    }

    fn set_velocities(
        &mut self,
        forward_back: i32,
        left_right: i32,
        up_down: i32,
        yaw: i32,
    ) -> Result<()> {
        self.send_rc(&rc_command(forward_back, left_right, up_down, yaw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_angles_are_whole_degrees() {
        assert_eq!(centidegrees_to_wire(9000), 90);
        assert_eq!(centidegrees_to_wire(3866), 39);
        assert_eq!(centidegrees_to_wire(49), 0);
    }

    #[test]
    fn rc_channels_are_reordered_and_clamped() {
        assert_eq!(rc_command(64, 0, 10, 0), "rc 0 64 10 0");
        assert_eq!(rc_command(640, 0, -250, 0), "rc 0 100 -100 0");
    }
}
