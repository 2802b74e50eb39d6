//! Input device handling
//!
//! Reads raw input events from a /dev/input/eventN device node.
//! - `EventDevice` wraps one open node (evdev crate + non-blocking fd)
//! - `DeviceEvent` is the transient type/code/value record
//! - `EventReader` is the seam that lets tests substitute a fake device

pub mod device;
pub mod event;

use std::os::unix::io::RawFd;

pub use device::{DeviceError, EventDevice};
pub use event::DeviceEvent;

/// Source of input events backed by a pollable descriptor.
///
/// `drain` fetches everything currently available in one read and returns
/// the events in OS-delivery order. An empty batch is not an error; a
/// readiness notification may race with another consumer.
pub trait EventReader {
    /// Descriptor to register with the event loop
    fn raw_fd(&self) -> RawFd;

    /// Fetch all currently available events (non-blocking)
    fn drain(&mut self) -> Result<Vec<DeviceEvent>, DeviceError>;
}
