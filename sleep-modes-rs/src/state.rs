// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! State shared between the button interrupt handler and the dispatcher

use core::cell::Cell;

use log::trace;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::RetainedState;
use crate::ResetBehavior;

/// State of the device
///
/// The interrupt handler only writes the volatile press counter.
/// The dispatcher writes everything else.
/// Every access happens inside a critical section.
pub struct DeviceState {
    /// Press counter written by the interrupt handler
    ///
    /// Not retained across deep sleep.
    presses: Mutex<CriticalSectionRawMutex, Cell<u8>>,

    /// Retained state
    retained: Mutex<CriticalSectionRawMutex, Cell<RetainedState>>,
}

impl DeviceState {
    /// Create a state restored from retained memory
    ///
    /// The volatile press counter always starts from zero.
    #[must_use]
    pub const fn new(retained: RetainedState) -> Self {
        Self {
            presses: Mutex::new(Cell::new(0)),
            retained: Mutex::new(Cell::new(retained)),
        }
    }

    /// Record a button press
    ///
    /// This is the body of the interrupt handler.
    /// The new counter is derived from the persisted counter rather than from
    /// the volatile one, so several presses before the next dispatcher cycle
    /// still count as one.
    pub fn record_press(&self) {
        self.retained.lock(|retained| {
            let next = retained.get().counter().saturating_add(1);
            self.presses.lock(|presses| presses.set(next));
        });
    }

    /// Return the volatile press counter
    #[must_use]
    pub fn presses(&self) -> u8 {
        self.presses.lock(Cell::get)
    }

    /// Return a copy of the retained state
    #[must_use]
    pub fn retained(&self) -> RetainedState {
        self.retained.lock(Cell::get)
    }

    /// Copy the volatile press counter into the retained state
    ///
    /// Returns the updated retained state.
    pub fn synchronize(&self) -> RetainedState {
        self.retained.lock(|retained| {
            let presses = self.presses();
            let mut state = retained.get();
            state.set_counter(presses);
            retained.set(state);
            trace!("Synchronized counter {presses}");
            state
        })
    }

    /// Fire the light-sleep guard
    pub fn fire_light_sleep_guard(&self) {
        self.update(|state| state.light_sleep_mut().fire());
    }

    /// Fire the deep-sleep guard
    pub fn fire_deep_sleep_guard(&self) {
        self.update(|state| state.deep_sleep_mut().fire());
    }

    /// Go back to off
    ///
    /// Both counters are zeroed and the deep-sleep guard is cleared.
    /// The light-sleep guard is fired or cleared depending on the behavior.
    pub fn reset(&self, behavior: ResetBehavior) {
        self.retained.lock(|retained| {
            self.presses.lock(|presses| presses.set(0));

            let mut state = retained.get();
            state.set_counter(0);
            state.deep_sleep_mut().clear();
            match behavior {
                ResetBehavior::Legacy => state.light_sleep_mut().fire(),
                ResetBehavior::ClearAll => state.light_sleep_mut().clear(),
            }
            retained.set(state);
        });
    }

    /// Apply a change to the retained state
    fn update(&self, change: impl FnOnce(&mut RetainedState)) {
        self.retained.lock(|retained| {
            let mut state = retained.get();
            change(&mut state);
            retained.set(state);
        });
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new(RetainedState::default())
    }
}
