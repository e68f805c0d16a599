// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Functions for module sleep

use log::error;
use log::info;

use esp_hal::gpio::RtcPinWithResistors;
use esp_hal::rtc_cntl::sleep::GpioWakeupSource;
use esp_hal::rtc_cntl::sleep::RtcioWakeupSource;
use esp_hal::rtc_cntl::sleep::WakeupLevel as RtcWakeupLevel;
use esp_hal::rtc_cntl::wakeup_cause;
use esp_hal::rtc_cntl::Rtc;

use sleep_modes_rs::Sleep;
use sleep_modes_rs::WakeupLevel;

use crate::button;
use crate::button::ButtonPin;

/// Sleep primitives of the RTC controller, woken up by the button
pub struct RtcSleep {
    /// RTC controller
    rtc: Rtc<'static>,
}

impl RtcSleep {
    /// Create new sleep primitives
    pub fn new(rtc: Rtc<'static>) -> Self {
        Self { rtc }
    }
}

impl Sleep for RtcSleep {
    fn enter_light(&mut self, level: WakeupLevel) {
        if let Err(error) = button::enable_wakeup(level) {
            error!("Cannot use button as wakeup source: {error:?}");
        }

        let wakeup_source = GpioWakeupSource::new();

        info!("Entering light sleep until button is {level:?}");
        self.rtc.sleep_light(&[&wakeup_source]);
        info!("Wakeup cause: {:?}", wakeup_cause());

        if let Err(error) = button::restore_edge_interrupt() {
            error!("Cannot restore button interrupt: {error:?}");
        }
    }

    fn enter_deep(&mut self, level: WakeupLevel) {
        enter_deep(&mut self.rtc, level);
    }
}

/// Enter deep sleep until the button reaches the level
///
/// The device restarts from the entry point when it wakes up.
fn enter_deep(rtc: &mut Rtc<'static>, level: WakeupLevel) -> ! {
    // SAFETY:
    // The button input is never used again, the device resets on wakeup
    let mut pin = unsafe { ButtonPin::steal() };

    // Digital pad pulls are off during deep sleep
    pin.rtcio_pullup(level == WakeupLevel::Low);
    pin.rtcio_pulldown(level == WakeupLevel::High);

    let rtc_level = match level {
        WakeupLevel::Low => RtcWakeupLevel::Low,
        WakeupLevel::High => RtcWakeupLevel::High,
    };
    let wakeup_pins: &mut [(&mut dyn RtcPinWithResistors, RtcWakeupLevel)] =
        &mut [(&mut pin, rtc_level)];
    let wakeup_source = RtcioWakeupSource::new(wakeup_pins);

    info!("Entering deep sleep until button is {level:?}");
    rtc.sleep_deep(&[&wakeup_source]);
}
