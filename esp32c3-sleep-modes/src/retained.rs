// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Storage for state retained across deep sleep

use core::cell::Cell;

use log::info;
use log::warn;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use esp_hal::ram;

use sleep_modes_rs::RetainedState;
use sleep_modes_rs::RetainedStorage;

/// Encoded retained state
///
/// This is a statically allocated variable and it is placed in the RTC Fast
/// memory, which survives deep sleep.
/// It is zeroed on a cold boot.
#[ram(rtc_fast)]
static RETAINED: Mutex<CriticalSectionRawMutex, Cell<[u8; RetainedState::SIZE]>> =
    Mutex::new(Cell::new([0; RetainedState::SIZE]));

/// A storage backed by RTC Fast memory
pub struct RtcStorage;

impl RetainedStorage for RtcStorage {
    fn load(&self) -> RetainedState {
        let bytes = RETAINED.lock(Cell::get);

        if let Some(state) = RetainedState::from_bytes(bytes) {
            info!("Retained state loaded from RTC memory: {state:?}");
            state
        } else {
            if bytes == [0; RetainedState::SIZE] {
                info!("No retained state in RTC memory");
            } else {
                warn!("Discarding invalid retained state {bytes:02x?}");
            }
            RetainedState::default()
        }
    }

    fn save(&mut self, state: &RetainedState) {
        info!("Store retained state to RTC memory: {state:?}");
        RETAINED.lock(|bytes| bytes.set(state.to_bytes()));
    }
}
