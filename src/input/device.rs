//! Input device node handle
//!
//! Owns one open /dev/input/eventN node for the lifetime of the process.
//! The descriptor is switched to non-blocking so a drain after a readiness
//! notification never stalls the event loop, and it is closed when the
//! handle is dropped (including the signal-driven exit path).

use anyhow::anyhow;
use log::info;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::event::DeviceEvent;
use super::EventReader;

/// Faults while opening or reading a device node
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open input device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read from input device failed: {0}")]
    Read(#[from] io::Error),
}

/// One open input device node
pub struct EventDevice {
    device: evdev::Device,
    path: PathBuf,
    name: String,
}

impl EventDevice {
    /// Open a device node and set its descriptor to non-blocking.
    ///
    /// Fails here, before any event-loop registration, if the path does not
    /// exist or is not readable.
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let device = evdev::Device::open(path).map_err(|e| DeviceError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Set fd to non-blocking
        let fd = device.as_raw_fd();
        set_nonblocking(fd).map_err(|e| DeviceError::Open {
            path: path.to_path_buf(),
            source: io::Error::other(e),
        })?;

        let name = device.name().unwrap_or("Unnamed device").to_string();
        info!("Input device opened: {} ({})", path.display(), name);

        Ok(Self {
            device,
            path: path.to_path_buf(),
            name,
        })
    }

    /// Kernel-reported device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path this device was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventReader for EventDevice {
    fn raw_fd(&self) -> RawFd {
        self.device.as_raw_fd()
    }

    fn drain(&mut self) -> Result<Vec<DeviceEvent>, DeviceError> {
        match self.device.fetch_events() {
            Ok(events) => Ok(events.map(DeviceEvent::from).collect()),
            // Another consumer may have raced us to the data
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Vec::new()),
            Err(e) => Err(DeviceError::Read(e)),
        }
    }
}

fn set_nonblocking(fd: RawFd) -> anyhow::Result<()> {
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| anyhow!("F_GETFL failed: {}", e))?;
    let mut flags = OFlag::from_bits_truncate(flags);
    flags.insert(OFlag::O_NONBLOCK);
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|e| anyhow!("F_SETFL failed: {}", e))?;
    Ok(())
}
