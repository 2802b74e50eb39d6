//! Device event printer
//!
//! Bridges an input device into the event loop: each readiness
//! notification drains the device and writes one line per event, in
//! delivery order. No buffering or batching beyond what the kernel and
//! the readiness semantics already provide.

use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::os::unix::io::RawFd;

use crate::event_loop::{Control, ReadySource};
use crate::input::EventReader;

pub struct EventPrinter<R: EventReader, W: Write> {
    reader: R,
    out: W,
    timestamps: bool,
}

impl<R: EventReader, W: Write> EventPrinter<R, W> {
    /// Takes an already-open reader and the sink to print into.
    pub fn new(reader: R, out: W, timestamps: bool) -> Self {
        Self {
            reader,
            out,
            timestamps,
        }
    }
}

impl<R: EventReader, W: Write> ReadySource for EventPrinter<R, W> {
    fn raw_fd(&self) -> RawFd {
        self.reader.raw_fd()
    }

    fn on_ready(&mut self) -> Result<Control> {
        // A read fault is fatal to the dispatch; the loop exits with it
        let events = self
            .reader
            .drain()
            .context("Failed to read from input device")?;

        if events.is_empty() {
            debug!("Readiness notification with no events");
            return Ok(Control::Continue);
        }

        for event in &events {
            writeln!(self.out, "{}", event.render(self.timestamps))
                .context("Failed to write event")?;
        }
        self.out.flush().context("Failed to flush output")?;

        Ok(Control::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceError, DeviceEvent};
    use std::collections::VecDeque;
    use std::io;
    use std::time::{Duration, UNIX_EPOCH};

    struct ScriptedReader {
        batches: VecDeque<Result<Vec<DeviceEvent>, DeviceError>>,
    }

    impl ScriptedReader {
        fn new(batches: Vec<Result<Vec<DeviceEvent>, DeviceError>>) -> Self {
            Self {
                batches: batches.into(),
            }
        }
    }

    impl EventReader for ScriptedReader {
        fn raw_fd(&self) -> RawFd {
            -1
        }

        fn drain(&mut self) -> Result<Vec<DeviceEvent>, DeviceError> {
            self.batches.pop_front().expect("script exhausted")
        }
    }

    fn ev(sec: u64, event_type: u16, code: u16, value: i32) -> DeviceEvent {
        DeviceEvent::new(UNIX_EPOCH + Duration::from_secs(sec), event_type, code, value)
    }

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_one_line_per_event_in_order() {
        let reader = ScriptedReader::new(vec![Ok(vec![
            ev(10, 1, 272, 1),
            ev(10, 0, 0, 0),
            ev(11, 1, 272, 0),
        ])]);
        let mut printer = EventPrinter::new(reader, Vec::new(), false);

        assert_eq!(printer.on_ready().unwrap(), Control::Continue);

        let out = lines(&printer.out);
        assert_eq!(
            out,
            vec![
                "event: type 1 (EV_KEY), code 272, value 1",
                "event: type 0 (EV_SYN), code 0, value 0",
                "event: type 1 (EV_KEY), code 272, value 0",
            ]
        );
    }

    #[test]
    fn test_empty_batch_prints_nothing_and_keeps_going() {
        let reader = ScriptedReader::new(vec![Ok(vec![])]);
        let mut printer = EventPrinter::new(reader, Vec::new(), true);

        assert_eq!(printer.on_ready().unwrap(), Control::Continue);
        assert!(printer.out.is_empty());
    }

    #[test]
    fn test_press_empty_release_scenario() {
        // Three readiness notifications: button press, nothing, release.
        // Exactly two lines, press first, and the printer keeps running.
        let reader = ScriptedReader::new(vec![
            Ok(vec![ev(100, 1, 272, 1)]),
            Ok(vec![]),
            Ok(vec![ev(101, 1, 272, 0)]),
        ]);
        let mut printer = EventPrinter::new(reader, Vec::new(), false);

        for _ in 0..3 {
            assert_eq!(printer.on_ready().unwrap(), Control::Continue);
        }

        let out = lines(&printer.out);
        assert_eq!(
            out,
            vec![
                "event: type 1 (EV_KEY), code 272, value 1",
                "event: type 1 (EV_KEY), code 272, value 0",
            ]
        );
    }

    #[test]
    fn test_read_fault_propagates() {
        let reader = ScriptedReader::new(vec![Err(DeviceError::Read(io::Error::new(
            io::ErrorKind::Other,
            "device unplugged",
        )))]);
        let mut printer = EventPrinter::new(reader, Vec::new(), true);

        let err = printer.on_ready().expect_err("fault must propagate");
        assert!(format!("{:#}", err).contains("device unplugged"));
    }

    #[test]
    fn test_timestamps_toggle() {
        let reader = ScriptedReader::new(vec![Ok(vec![ev(42, 1, 30, 1)])]);
        let mut printer = EventPrinter::new(reader, Vec::new(), true);
        printer.on_ready().unwrap();

        let out = lines(&printer.out);
        assert_eq!(out, vec!["event at 42.000000, type 1 (EV_KEY), code 30, value 1"]);
    }
}
