//! evtap - evdev input event watcher for the Linux console
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              Event Loop                  │
//! ├──────────────────────────────────────────┤
//! │  Device (/dev/input/eventN)              │
//! │              ↓ readiness (poll)          │
//! │  Printer (one line per event)            │
//! │              ↓                           │
//! │  stdout                                  │
//! └──────────────────────────────────────────┘
//! ```

mod config;
mod event_loop;
mod input;
mod printer;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Print help message
fn print_help() {
    println!(
        r#"evtap {} - evdev input event watcher for the Linux console

USAGE:
    evtap [OPTIONS] [DEVICE]

ARGS:
    DEVICE                  Input device node (default: from config,
                            falling back to /dev/input/event0)

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -l, --list              List available input devices
    --init-config           Generate config file
    -f, --force             Overwrite config file without confirmation

EXAMPLES:
    evtap                             Watch the configured device
    evtap /dev/input/event3           Watch a specific device
    evtap --list                      Show device nodes and their names
    sudo evtap                        Run with privileges for /dev/input

CONFIG FILE:
    ~/.config/evtap/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// List /dev/input/event* nodes with their kernel-reported names
fn list_devices() {
    let mut devices: Vec<_> = evdev::enumerate().collect();
    if devices.is_empty() {
        eprintln!("No input devices found. Check permissions for /dev/input/event*.");
        return;
    }
    devices.sort_by(|a, b| a.0.cmp(&b.0));
    for (path, device) in &devices {
        println!(
            "{}: {}",
            path.display(),
            device.name().unwrap_or("Unnamed device")
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("evtap {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --list
    if args.iter().any(|a| a == "--list" || a == "-l") {
        list_devices();
        return Ok(());
    }

    // Config file generation mode
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        let path = config::Config::write_default(force)?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    // Positional argument overrides the configured device path
    let device_path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(|| cfg.device.path.clone());

    // Signal handlers before the loop so SIGTERM/SIGINT exit cleanly,
    // dropping the device handle and closing its descriptor
    event_loop::setup_signal_handlers();

    // Open the device up front: a bad path fails here, not on first read
    let device = input::EventDevice::open(Path::new(&device_path))
        .with_context(|| format!("Failed to open input device {}", device_path))?;

    info!("Watching {} ({})", device.path().display(), device.name());

    let printer = printer::EventPrinter::new(device, std::io::stdout(), cfg.output.timestamps);

    let mut event_loop = event_loop::EventLoop::new();
    event_loop.register(Box::new(printer));
    event_loop.run()
}
