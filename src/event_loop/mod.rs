//! Readiness-driven event loop
//!
//! Single-threaded dispatch: a registry of descriptor -> handler, polled
//! with poll(2). A handler runs to completion once its descriptor is
//! readable; there is no suspension outside the poll call itself.
//!
//! Fault policy is log-and-exit: a handler error or a descriptor error
//! condition (POLLERR/POLLHUP) aborts the loop and propagates to the
//! caller instead of unwinding uncontrolled or hanging silently.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use log::{debug, info};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::os::unix::io::{BorrowedFd, RawFd};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for shutdown requested via signal (SIGTERM/SIGINT/SIGHUP)
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if shutdown was requested (SIGTERM, SIGINT, or SIGHUP)
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Relaxed)
}

/// Set up signal handlers for graceful shutdown (call once at startup)
///
/// Handles SIGTERM (service stop), SIGINT (Ctrl+C), and SIGHUP (terminal
/// hangup). The handler only sets a flag; poll(2) returns EINTR and the
/// loop observes it on the next iteration.
pub fn setup_signal_handlers() {
    unsafe {
        libc::signal(
            libc::SIGTERM,
            shutdown_signal_handler as *const () as libc::sighandler_t,
        );
        libc::signal(
            libc::SIGINT,
            shutdown_signal_handler as *const () as libc::sighandler_t,
        );
        libc::signal(
            libc::SIGHUP,
            shutdown_signal_handler as *const () as libc::sighandler_t,
        );
    }
}

extern "C" fn shutdown_signal_handler(_signo: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::Relaxed);
}

/// What the loop should do after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep waiting for readiness
    Continue,
    /// Stop the loop cleanly
    Quit,
}

/// A registered readiness callback.
///
/// `on_ready` is invoked exactly once per readiness notification for the
/// descriptor returned by `raw_fd`, and runs to completion before the loop
/// polls again. The descriptor must stay valid while registered.
pub trait ReadySource {
    fn raw_fd(&self) -> RawFd;
    fn on_ready(&mut self) -> Result<Control>;
}

/// Registry of descriptor -> handler, polled until quit, fault, or signal
pub struct EventLoop {
    sources: Vec<Box<dyn ReadySource>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a source for read-readiness dispatch
    pub fn register(&mut self, source: Box<dyn ReadySource>) {
        debug!("Registered source fd={}", source.raw_fd());
        self.sources.push(source);
    }

    /// Block on readiness and dispatch until a source quits, a fault
    /// occurs, or a shutdown signal is observed.
    pub fn run(&mut self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("event loop has no registered sources");
        }

        loop {
            if shutdown_requested() {
                info!("Shutdown signal received, exiting event loop");
                return Ok(());
            }

            let raw_fds: Vec<RawFd> = self.sources.iter().map(|s| s.raw_fd()).collect();
            let mut fds: Vec<PollFd> = raw_fds
                .iter()
                .map(|&fd| {
                    let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
                    PollFd::new(borrowed, PollFlags::POLLIN)
                })
                .collect();

            match poll(&mut fds, PollTimeout::NONE) {
                Ok(0) => continue,
                Ok(_) => {}
                // Signal delivery interrupts poll; re-check the flag
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(anyhow!("poll failed: {}", e)),
            }

            let revents: Vec<PollFlags> = fds
                .iter()
                .map(|p| p.revents().unwrap_or(PollFlags::empty()))
                .collect();
            drop(fds);

            for (i, flags) in revents.into_iter().enumerate() {
                if flags.contains(PollFlags::POLLIN) {
                    // Readable data is drained before any HUP is acted on
                    match self.sources[i].on_ready()? {
                        Control::Continue => {}
                        Control::Quit => {
                            info!("Source fd={} requested quit", raw_fds[i]);
                            return Ok(());
                        }
                    }
                } else if flags
                    .intersects(PollFlags::POLLERR | PollFlags::POLLHUP | PollFlags::POLLNVAL)
                {
                    bail!(
                        "input source fd={} went away ({:?})",
                        raw_fds[i],
                        flags
                    );
                }
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
