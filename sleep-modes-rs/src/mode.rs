// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Operating modes

use crate::RetainedState;

/// Counter value for off
const OFF: u8 = 0;

/// Counter value for on
const ON: u8 = 1;

/// Counter value for flashing
const FLASHING: u8 = 2;

/// Counter value for light sleep
const LIGHT_SLEEP: u8 = 3;

/// Counter value for deep sleep
const DEEP_SLEEP: u8 = 4;

/// The mode active during a dispatcher cycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Both indicators inactive
    Off,

    /// Primary indicator active
    On,

    /// Secondary indicator pulsing
    Flashing,

    /// Light sleep must be entered
    LightSleepPending,

    /// Light sleep was already entered for this press
    LightSleepDone,

    /// Deep sleep must be entered
    DeepSleepPending,

    /// Deep sleep was already entered for this press
    DeepSleepDone,

    /// Counter past the last mode, go back to off
    Reset,
}

impl Mode {
    /// Resolve the mode from the retained state
    #[must_use]
    pub const fn resolve(state: &RetainedState) -> Self {
        match state.counter() {
            OFF => Self::Off,
            ON => Self::On,
            FLASHING => Self::Flashing,
            LIGHT_SLEEP if state.light_sleep().is_armed() => Self::LightSleepPending,
            LIGHT_SLEEP => Self::LightSleepDone,
            DEEP_SLEEP if state.deep_sleep().is_armed() => Self::DeepSleepPending,
            DEEP_SLEEP => Self::DeepSleepDone,
            _ => Self::Reset,
        }
    }

    /// Check whether the counter value keeps the flashing mode
    #[must_use]
    pub const fn is_flashing(counter: u8) -> bool {
        counter == FLASHING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::SleepGuard;

    /// Build a state with the given counter and guards
    fn state(counter: u8, light_sleep: SleepGuard, deep_sleep: SleepGuard) -> RetainedState {
        RetainedState::new(counter, light_sleep, deep_sleep)
    }

    #[test]
    fn output_modes_ignore_guards() {
        for guard in [SleepGuard::armed(), SleepGuard::fired()] {
            assert_eq!(Mode::resolve(&state(0, guard, guard)), Mode::Off);
            assert_eq!(Mode::resolve(&state(1, guard, guard)), Mode::On);
            assert_eq!(Mode::resolve(&state(2, guard, guard)), Mode::Flashing);
        }
    }

    #[test]
    fn light_sleep_depends_on_its_guard_only() {
        let armed = SleepGuard::armed();
        let fired = SleepGuard::fired();

        assert_eq!(Mode::resolve(&state(3, armed, fired)), Mode::LightSleepPending);
        assert_eq!(Mode::resolve(&state(3, fired, armed)), Mode::LightSleepDone);
    }

    #[test]
    fn deep_sleep_depends_on_its_guard_only() {
        let armed = SleepGuard::armed();
        let fired = SleepGuard::fired();

        assert_eq!(Mode::resolve(&state(4, fired, armed)), Mode::DeepSleepPending);
        assert_eq!(Mode::resolve(&state(4, armed, fired)), Mode::DeepSleepDone);
    }

    #[test]
    fn counters_past_deep_sleep_reset() {
        let armed = SleepGuard::armed();
        for counter in [5, 6, 42, u8::MAX] {
            assert_eq!(Mode::resolve(&state(counter, armed, armed)), Mode::Reset);
        }
    }
}
