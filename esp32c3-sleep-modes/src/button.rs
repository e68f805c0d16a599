// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Button interrupt handling

use core::cell::RefCell;

use log::debug;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use esp_hal::gpio::Event;
use esp_hal::gpio::Input;
use esp_hal::gpio::Io;
use esp_hal::gpio::WakeConfigError;
use esp_hal::gpio::WakeEvent;
use esp_hal::handler;
use esp_hal::peripherals::GPIO3;
use esp_hal::ram;

use sleep_modes_rs::DeviceState;
use sleep_modes_rs::WakeupLevel;

/// The GPIO the button is wired to
///
/// It must be an RTC GPIO, otherwise it cannot wake the device up from deep
/// sleep.
pub type ButtonPin = GPIO3;

/// A button input bound to the state it updates
struct Button {
    /// Input pin
    input: Input<'static>,

    /// State updated on presses
    state: &'static DeviceState,
}

/// The registered button
///
/// The interrupt handler has no arguments, so the button must be reachable
/// from here.
static BUTTON: Mutex<CriticalSectionRawMutex, RefCell<Option<Button>>> =
    Mutex::new(RefCell::new(None));

/// Register the interrupt handler for button presses
///
/// Every falling edge on the input records a press on the state.
pub fn register(io: &mut Io, mut input: Input<'static>, state: &'static DeviceState) {
    io.set_interrupt_handler(on_interrupt);

    BUTTON.lock(|button| {
        input.listen(Event::FallingEdge);
        *button.borrow_mut() = Some(Button { input, state });
    });

    debug!("Button interrupt registered");
}

/// Let the button wake the device up from light sleep
///
/// # Errors
///
/// Returns an error if the button was not registered or the wakeup event
/// cannot be configured
pub fn enable_wakeup(level: WakeupLevel) -> Result<(), Error> {
    let event = match level {
        WakeupLevel::Low => WakeEvent::LowLevel,
        WakeupLevel::High => WakeEvent::HighLevel,
    };
    with_input(|input| Ok(input.wakeup_enable(true, event)?))
}

/// Go back to edge interrupts after waking up
///
/// Wakeup events and edge detection share the same interrupt type, so the
/// level-triggered wakeup must be undone.
///
/// # Errors
///
/// Returns an error if the button was not registered or the wakeup event
/// cannot be configured
pub fn restore_edge_interrupt() -> Result<(), Error> {
    with_input(|input| {
        input.wakeup_enable(false, WakeEvent::LowLevel)?;
        input.listen(Event::FallingEdge);
        Ok(())
    })
}

/// Run a function on the registered input
fn with_input(
    function: impl FnOnce(&mut Input<'static>) -> Result<(), Error>,
) -> Result<(), Error> {
    BUTTON.lock(|button| {
        let mut button = button.borrow_mut();
        let button = button.as_mut().ok_or(Error::NotRegistered)?;
        function(&mut button.input)
    })
}

/// Interrupt handler for GPIO events
#[handler]
#[ram]
fn on_interrupt() {
    BUTTON.lock(|button| {
        if let Some(button) = button.borrow_mut().as_mut() {
            if button.input.is_interrupt_set() {
                button.input.clear_interrupt();
                button.state.record_press();
            }
        }
    });
}

/// An error in button handling
#[derive(Debug)]
pub enum Error {
    /// The button was not registered yet
    NotRegistered,

    /// The wakeup event cannot be configured
    #[expect(unused, reason = "Never read directly")]
    Wakeup(WakeConfigError),
}

impl From<WakeConfigError> for Error {
    fn from(error: WakeConfigError) -> Self {
        Self::Wakeup(error)
    }
}
