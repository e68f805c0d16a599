// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Blocking dispatcher

use log::debug;
use log::info;
use log::trace;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::Config;
use crate::DeviceState;
use crate::Error;
use crate::Indicators;
use crate::Line;
use crate::Mode;
use crate::Outcome;
use crate::RetainedStorage;
use crate::Sleep;

/// The state machine dispatcher
///
/// Each call to [`Dispatcher::run_cycle()`] runs one iteration of the main
/// loop.
pub struct Dispatcher<'state, PRIMARY, SECONDARY, DELAY, SLEEP, STORAGE>
where
    PRIMARY: OutputPin,
    SECONDARY: OutputPin,
    DELAY: DelayNs,
    SLEEP: Sleep,
    STORAGE: RetainedStorage,
{
    /// State shared with the interrupt handler
    state: &'state DeviceState,

    /// Indicators
    indicators: Indicators<PRIMARY, SECONDARY>,

    /// Delay
    delay: DELAY,

    /// Sleep primitives
    sleep: SLEEP,

    /// Storage for state retained across deep sleep
    storage: STORAGE,

    /// Configuration
    config: Config,
}

impl<'state, PRIMARY, SECONDARY, DELAY, SLEEP, STORAGE>
    Dispatcher<'state, PRIMARY, SECONDARY, DELAY, SLEEP, STORAGE>
where
    PRIMARY: OutputPin,
    SECONDARY: OutputPin,
    DELAY: DelayNs,
    SLEEP: Sleep,
    STORAGE: RetainedStorage,
{
    /// Create a new dispatcher
    #[must_use]
    pub fn new(
        state: &'state DeviceState,
        indicators: Indicators<PRIMARY, SECONDARY>,
        delay: DELAY,
        sleep: SLEEP,
        storage: STORAGE,
        config: Config,
    ) -> Self {
        Self {
            state,
            indicators,
            delay,
            sleep,
            storage,
            config,
        }
    }

    /// Run a single cycle
    ///
    /// # Errors
    ///
    /// Returns an error if driving any indicator fails
    pub fn run_cycle(&mut self) -> Result<Outcome, Error> {
        let retained = self.state.synchronize();
        let mode = Mode::resolve(&retained);
        debug!("Counter {} selects mode {mode:?}", retained.counter());

        match mode {
            Mode::Off => self.indicators.set(false, false)?,
            Mode::On => self.indicators.set(true, false)?,
            Mode::Flashing => self.flash()?,
            Mode::LightSleepPending => self.enter_light_sleep(),
            Mode::DeepSleepPending => {
                self.enter_deep_sleep();
                return Ok(Outcome::Restart);
            }
            Mode::LightSleepDone | Mode::DeepSleepDone => {
                trace!("Already slept for this press");
            }
            Mode::Reset => {
                info!("Reset to off");
                self.state.reset(self.config.reset_behavior);
            }
        }

        self.delay.delay_ms(self.config.cycle_period_ms);

        Ok(Outcome::Continue)
    }

    /// Release the dispatcher and return the inner hardware
    pub fn release(self) -> (Indicators<PRIMARY, SECONDARY>, DELAY, SLEEP, STORAGE) {
        (self.indicators, self.delay, self.sleep, self.storage)
    }

    /// Pulse the secondary indicator until the counter changes
    ///
    /// # Errors
    ///
    /// Returns an error if driving any indicator fails
    fn flash(&mut self) -> Result<(), Error> {
        self.indicators.set_line(Line::Primary, false)?;

        let mut pulses = 0_u32;
        while Mode::is_flashing(self.state.presses()) && self.config.allows_pulse(pulses) {
            self.indicators.set_line(Line::Secondary, true)?;
            self.delay.delay_ms(self.config.flash_on_ms);
            self.indicators.set_line(Line::Secondary, false)?;
            self.delay.delay_ms(self.config.flash_off_ms);
            pulses = pulses.saturating_add(1);
        }

        debug!("Stop flashing after {pulses} pulses");

        Ok(())
    }

    /// Enter light sleep, and return after waking up
    fn enter_light_sleep(&mut self) {
        info!("Entering light sleep");
        self.state.fire_light_sleep_guard();

        self.delay.delay_ms(self.config.pre_sleep_delay_ms);
        self.sleep.enter_light(self.config.wakeup_level);

        info!("Woke up from light sleep");
    }

    /// Store the retained state and enter deep sleep
    fn enter_deep_sleep(&mut self) {
        info!("Entering deep sleep");
        self.state.fire_deep_sleep_guard();
        self.storage.save(&self.state.retained());

        self.delay.delay_ms(self.config.pre_sleep_delay_ms);
        self.sleep.enter_deep(self.config.wakeup_level);
    }
}
