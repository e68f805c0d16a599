// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Dispatcher configuration

use crate::WakeupLevel;

/// What the reset transition does to the sleep guards
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResetBehavior {
    /// Clear the deep-sleep guard but fire the light-sleep guard
    ///
    /// After the first reset light sleep is skipped until the next power
    /// cycle.
    /// Devices in the field behave like this.
    #[default]
    Legacy,

    /// Clear both guards
    ClearAll,
}

/// Dispatcher configuration
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Delay at the end of every cycle
    pub cycle_period_ms: u32,

    /// Time the secondary indicator stays active in a pulse
    pub flash_on_ms: u32,

    /// Time the secondary indicator stays inactive in a pulse
    pub flash_off_ms: u32,

    /// Delay between announcing a sleep mode and entering it
    pub pre_sleep_delay_ms: u32,

    /// Maximal number of pulses in a single cycle
    ///
    /// `None` keeps flashing for as long as the counter does not change.
    pub max_pulses_per_cycle: Option<u32>,

    /// Guard handling in the reset transition
    pub reset_behavior: ResetBehavior,

    /// Button level that wakes the device up
    pub wakeup_level: WakeupLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle_period_ms: 100,
            flash_on_ms: 50,
            flash_off_ms: 950,
            pre_sleep_delay_ms: 100,
            max_pulses_per_cycle: None,
            reset_behavior: ResetBehavior::Legacy,
            wakeup_level: WakeupLevel::Low,
        }
    }
}

impl Config {
    /// Set the cycle period
    #[must_use]
    pub const fn with_cycle_period_ms(mut self, cycle_period_ms: u32) -> Self {
        self.cycle_period_ms = cycle_period_ms;
        self
    }

    /// Set the pulse timings
    #[must_use]
    pub const fn with_flash_ms(mut self, flash_on_ms: u32, flash_off_ms: u32) -> Self {
        self.flash_on_ms = flash_on_ms;
        self.flash_off_ms = flash_off_ms;
        self
    }

    /// Set the delay before entering a sleep mode
    #[must_use]
    pub const fn with_pre_sleep_delay_ms(mut self, pre_sleep_delay_ms: u32) -> Self {
        self.pre_sleep_delay_ms = pre_sleep_delay_ms;
        self
    }

    /// Bound the number of pulses in a single cycle
    #[must_use]
    pub const fn with_max_pulses_per_cycle(mut self, max_pulses_per_cycle: Option<u32>) -> Self {
        self.max_pulses_per_cycle = max_pulses_per_cycle;
        self
    }

    /// Set the guard handling in the reset transition
    #[must_use]
    pub const fn with_reset_behavior(mut self, reset_behavior: ResetBehavior) -> Self {
        self.reset_behavior = reset_behavior;
        self
    }

    /// Set the wakeup level
    #[must_use]
    pub const fn with_wakeup_level(mut self, wakeup_level: WakeupLevel) -> Self {
        self.wakeup_level = wakeup_level;
        self
    }

    /// Check whether another pulse fits in the current cycle
    pub(crate) fn allows_pulse(&self, pulses: u32) -> bool {
        match self.max_pulses_per_cycle {
            Some(max) => pulses < max,
            None => true,
        }
    }
}
