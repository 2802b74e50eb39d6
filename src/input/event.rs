//! Input event record
//!
//! One `DeviceEvent` per kernel `input_event`. Events are printed and
//! discarded; nothing here is retained across dispatches.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single input event as delivered by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEvent {
    /// Kernel timestamp of the event
    pub time: SystemTime,
    /// Event type (EV_KEY, EV_REL, ...)
    pub event_type: u16,
    /// Event code (key/button/axis number)
    pub code: u16,
    /// Event value (press/release/delta)
    pub value: i32,
}

impl DeviceEvent {
    pub fn new(time: SystemTime, event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time,
            event_type,
            code,
            value,
        }
    }

    /// Timestamp as (seconds, microseconds) since the epoch.
    /// A clock before the epoch renders as 0.000000 rather than failing.
    fn epoch_parts(&self) -> (u64, u32) {
        match self.time.duration_since(UNIX_EPOCH) {
            Ok(d) => (d.as_secs(), d.subsec_micros()),
            Err(_) => (0, 0),
        }
    }

    /// One printable line for this event, optionally with the timestamp
    pub fn render(&self, timestamps: bool) -> String {
        let fields = match event_type_name(self.event_type) {
            Some(name) => format!(
                "type {} ({}), code {}, value {}",
                self.event_type, name, self.code, self.value
            ),
            None => format!(
                "type {}, code {}, value {}",
                self.event_type, self.code, self.value
            ),
        };
        if timestamps {
            let (sec, usec) = self.epoch_parts();
            format!("event at {}.{:06}, {}", sec, usec, fields)
        } else {
            format!("event: {}", fields)
        }
    }
}

impl From<evdev::InputEvent> for DeviceEvent {
    fn from(ev: evdev::InputEvent) -> Self {
        Self::new(ev.timestamp(), ev.event_type().0, ev.code(), ev.value())
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Symbolic name for an event type (linux/input-event-codes.h)
pub fn event_type_name(event_type: u16) -> Option<&'static str> {
    match event_type {
        0x00 => Some("EV_SYN"),
        0x01 => Some("EV_KEY"),
        0x02 => Some("EV_REL"),
        0x03 => Some("EV_ABS"),
        0x04 => Some("EV_MSC"),
        0x05 => Some("EV_SW"),
        0x11 => Some("EV_LED"),
        0x12 => Some("EV_SND"),
        0x14 => Some("EV_REP"),
        0x15 => Some("EV_FF"),
        0x16 => Some("EV_PWR"),
        0x17 => Some("EV_FF_STATUS"),
        _ => None,
    }
}
