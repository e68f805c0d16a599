// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Test doubles recording every interaction in a shared journal

#![allow(dead_code, reason = "Not every test binary uses every double")]

use std::cell::RefCell;
use std::convert::Infallible;

use embedded_hal::digital::ErrorKind;
use embedded_hal::digital::ErrorType;
use embedded_hal::digital::OutputPin;

use sleep_modes_rs::DeviceState;
use sleep_modes_rs::Indicator;
use sleep_modes_rs::Indicators;
use sleep_modes_rs::MemoryStorage;
use sleep_modes_rs::Polarity;
use sleep_modes_rs::RetainedState;
use sleep_modes_rs::RetainedStorage;
use sleep_modes_rs::Sleep;
use sleep_modes_rs::WakeupLevel;

/// Name of the primary pin
pub const PRIMARY: &str = "primary";

/// Name of the secondary pin
pub const SECONDARY: &str = "secondary";

/// Something that happened to the hardware
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    /// A pin was set high
    High(&'static str),

    /// A pin was set low
    Low(&'static str),

    /// A delay in milliseconds
    Delay(u32),

    /// Light sleep was entered
    LightSleep(WakeupLevel),

    /// Deep sleep was entered
    DeepSleep(WakeupLevel),

    /// The retained state was saved with the given counter
    Save(u8),
}

/// An ordered list of events
#[derive(Default)]
pub struct Journal {
    /// Recorded events
    events: RefCell<Vec<Event>>,
}

impl Journal {
    /// Record an event
    pub fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Return all events
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Forget all events
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Count events equal to the given one
    pub fn count(&self, event: Event) -> usize {
        self.events.borrow().iter().filter(|&&other| other == event).count()
    }

    /// Return the last level set on a pin, `true` for high
    pub fn level(&self, name: &str) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|&event| match event {
            Event::High(pin) if pin == name => Some(true),
            Event::Low(pin) if pin == name => Some(false),
            _ => None,
        })
    }

    /// Count the sleep entries of any kind
    pub fn sleeps(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::LightSleep(_) | Event::DeepSleep(_)))
            .count()
    }
}

/// An output pin recording its levels
pub struct Pin<'journal> {
    /// Name used in events
    name: &'static str,

    /// Journal
    journal: &'journal Journal,
}

impl<'journal> Pin<'journal> {
    /// Create a new pin
    pub fn new(name: &'static str, journal: &'journal Journal) -> Self {
        Self { name, journal }
    }
}

impl ErrorType for Pin<'_> {
    type Error = Infallible;
}

impl OutputPin for Pin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Event::Low(self.name));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Event::High(self.name));
        Ok(())
    }
}

/// An output pin that always fails
pub struct BrokenPin;

/// Error returned by a broken pin
#[derive(Debug)]
pub struct BrokenPinError;

impl embedded_hal::digital::Error for BrokenPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for BrokenPin {
    type Error = BrokenPinError;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }
}

/// Create active-high indicators on recording pins
pub fn indicators(journal: &Journal) -> Indicators<Pin<'_>, Pin<'_>> {
    Indicators::new(
        Indicator::new(Pin::new(PRIMARY, journal), Polarity::ActiveHigh),
        Indicator::new(Pin::new(SECONDARY, journal), Polarity::ActiveHigh),
    )
}

/// A delay that returns immediately and can simulate button presses
pub struct Delay<'journal> {
    /// Journal
    journal: &'journal Journal,

    /// State receiving simulated presses
    state: &'journal DeviceState,

    /// Delay calls after which the button is pressed, counting from 1
    presses: Vec<usize>,

    /// Number of delay calls so far
    calls: usize,
}

impl<'journal> Delay<'journal> {
    /// Create a delay that never presses the button
    pub fn new(journal: &'journal Journal, state: &'journal DeviceState) -> Self {
        Self {
            journal,
            state,
            presses: Vec::new(),
            calls: 0,
        }
    }

    /// Press the button right after the given delay call
    #[must_use]
    pub fn press_after(mut self, call: usize) -> Self {
        self.presses.push(call);
        self
    }

    /// Record a delay and fire any scheduled press
    fn wait(&mut self, ms: u32) {
        self.calls += 1;
        self.journal.record(Event::Delay(ms));
        if self.presses.contains(&self.calls) {
            self.state.record_press();
        }
    }
}

impl embedded_hal::delay::DelayNs for Delay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(ns / 1_000_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(ms);
    }
}

impl embedded_hal_async::delay::DelayNs for Delay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.wait(ns / 1_000_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.wait(us / 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.wait(ms);
    }
}

/// Sleep primitives that return immediately
pub struct SleepSpy<'journal> {
    /// Journal
    journal: &'journal Journal,

    /// State receiving the press that wakes the device up from light sleep
    wake_press: Option<&'journal DeviceState>,
}

impl<'journal> SleepSpy<'journal> {
    /// Create a spy that wakes up without pressing the button
    pub fn new(journal: &'journal Journal) -> Self {
        Self {
            journal,
            wake_press: None,
        }
    }

    /// Wake up from light sleep with a button press
    #[must_use]
    pub fn with_wake_press(mut self, state: &'journal DeviceState) -> Self {
        self.wake_press = Some(state);
        self
    }
}

impl Sleep for SleepSpy<'_> {
    fn enter_light(&mut self, level: WakeupLevel) {
        self.journal.record(Event::LightSleep(level));
        if let Some(state) = self.wake_press {
            state.record_press();
        }
    }

    fn enter_deep(&mut self, level: WakeupLevel) {
        self.journal.record(Event::DeepSleep(level));
    }
}

/// A memory storage recording every save
pub struct Storage<'journal> {
    /// Journal
    journal: &'journal Journal,

    /// Inner storage
    inner: MemoryStorage,
}

impl<'journal> Storage<'journal> {
    /// Create an empty storage
    pub fn new(journal: &'journal Journal) -> Self {
        Self {
            journal,
            inner: MemoryStorage::new(),
        }
    }
}

impl RetainedStorage for Storage<'_> {
    fn load(&self) -> RetainedState {
        self.inner.load()
    }

    fn save(&mut self, state: &RetainedState) {
        self.journal.record(Event::Save(state.counter()));
        self.inner.save(state);
    }
}

/// Press the button and synchronize until the counter reaches the target
///
/// Used to bring the state to a given counter without running the
/// dispatcher.
pub fn advance_to(state: &DeviceState, target: u8) {
    while state.retained().counter() < target {
        state.record_press();
        let _ = state.synchronize();
    }
}
