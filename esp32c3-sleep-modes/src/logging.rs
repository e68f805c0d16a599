// Copyright Claudio Mattera 2024-2025.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Functions for setting up the logging system

use core::str::FromStr;

use log::max_level;
use log::set_logger_racy;
use log::set_max_level_racy;
use log::trace;
use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

use embassy_time::Instant;

use esp_println::println;

/// Default log level when `ESP_LOGLEVEL` is not set
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Setup logging
///
/// The log level is taken from the environment variable `ESP_LOGLEVEL` at
/// build time, and defaults to `INFO`.
///
/// This requires a clean rebuild because of
/// <https://github.com/rust-lang/cargo/issues/10358>
pub fn setup() {
    /// Log level
    const LEVEL: Option<&'static str> = option_env!("ESP_LOGLEVEL");

    // SAFETY:
    // This is called once at the beginning of main, before any interrupt
    // handler is registered
    let result = unsafe { set_logger_racy(&SerialLogger) };

    if result.is_err() {
        println!("Logger was already set");
        return;
    }

    let level = LEVEL.map_or(DEFAULT_LEVEL, |lvl| {
        LevelFilter::from_str(lvl).unwrap_or(DEFAULT_LEVEL)
    });

    // SAFETY:
    // Same as above, nothing else is running yet
    unsafe { set_max_level_racy(level) };

    trace!("Logger is ready");
}

/// Logger that prints messages to the serial console
struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with("esp_hal") {
            metadata.level() <= Level::Warn
        } else {
            metadata.level() <= max_level()
        }
    }

    fn log(&self, record: &Record) {
        /// Modifier for restoring normal text style
        const RESET: &str = "\u{001B}[0m";
        /// Modifier for setting gray text
        const GRAY: &str = "\u{001B}[2m";
        /// Modifier for setting red text
        const RED: &str = "\u{001B}[31m";
        /// Modifier for setting green text
        const GREEN: &str = "\u{001B}[32m";
        /// Modifier for setting yellow text
        const YELLOW: &str = "\u{001B}[33m";
        /// Modifier for setting blue text
        const BLUE: &str = "\u{001B}[34m";
        /// Modifier for setting cyan text
        const CYAN: &str = "\u{001B}[35m";

        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => RED,
            Level::Warn => YELLOW,
            Level::Info => GREEN,
            Level::Debug => BLUE,
            Level::Trace => CYAN,
        };

        let uptime = Instant::now().as_millis();

        println!(
            "{GRAY}{:>6}.{:03}{RESET} {color}{:>5}{RESET} {GRAY}{}]{RESET} {}",
            uptime / 1000,
            uptime % 1000,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}
