// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! A single-button state machine cycling through output and sleep modes
//!
//! Every button press advances a counter, and the counter selects a mode:
//!
//! | Counter | Mode                                     |
//! |---------|------------------------------------------|
//! | 0       | Off, both indicators inactive            |
//! | 1       | On, primary indicator active             |
//! | 2       | Flashing, secondary indicator pulsing    |
//! | 3       | Light sleep, once                        |
//! | 4       | Deep sleep, once                         |
//! | > 4     | Reset back to 0                          |
//!
//! The counter and the sleep guards live in [`RetainedState`], which is meant
//! to be stored in memory that survives deep sleep.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "async")]
mod r#async;
#[cfg(feature = "async")]
pub use self::r#async::Dispatcher as AsyncDispatcher;

#[cfg(feature = "blocking")]
mod blocking;
#[cfg(feature = "blocking")]
pub use self::blocking::Dispatcher;

mod config;
pub use self::config::Config;
pub use self::config::ResetBehavior;

mod error;
pub use self::error::Error;

mod indicator;
pub use self::indicator::Indicator;
pub use self::indicator::Indicators;
pub use self::indicator::Line;
pub use self::indicator::Polarity;

mod mode;
pub use self::mode::Mode;

mod retained;
pub use self::retained::MemoryStorage;
pub use self::retained::RetainedState;
pub use self::retained::RetainedStorage;
pub use self::retained::SleepGuard;

mod sleep;
pub use self::sleep::Outcome;
pub use self::sleep::Sleep;
pub use self::sleep::WakeupLevel;

mod state;
pub use self::state::DeviceState;
