// Copyright Claudio Mattera 2024-2025.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Main crate

#![no_std]
#![no_main]

use log::error;
use log::info;
use log::warn;

use embassy_executor::Spawner;

use embassy_time::Delay;

use esp_hal::clock::CpuClock;
use esp_hal::gpio::Input;
use esp_hal::gpio::InputConfig;
use esp_hal::gpio::Io;
use esp_hal::gpio::Level;
use esp_hal::gpio::Output;
use esp_hal::gpio::OutputConfig;
use esp_hal::gpio::Pull;
use esp_hal::init as initialize_esp_hal;
use esp_hal::rtc_cntl::reset_reason;
use esp_hal::rtc_cntl::wakeup_cause;
use esp_hal::rtc_cntl::Rtc;
use esp_hal::rtc_cntl::SocResetReason;
use esp_hal::system::Cpu;
use esp_hal::timer::systimer::SystemTimer;
use esp_hal::Config as EspConfig;

use esp_hal_embassy::init as initialize_embassy;

use esp_backtrace as _;

use static_cell::StaticCell;

use sleep_modes_rs::AsyncDispatcher;
use sleep_modes_rs::Config;
use sleep_modes_rs::DeviceState;
use sleep_modes_rs::Indicator;
use sleep_modes_rs::Indicators;
use sleep_modes_rs::Outcome;
use sleep_modes_rs::Polarity;
use sleep_modes_rs::RetainedStorage as _;

mod button;

mod logging;
use self::logging::setup as setup_logging;

mod retained;
use self::retained::RtcStorage;

mod sleep;
use self::sleep::RtcSleep;

/// Polarity of the LEDs, wired between the supply and the pins
const LED_POLARITY: Polarity = Polarity::ActiveLow;

/// State shared between the button interrupt handler and the main loop
static DEVICE_STATE: StaticCell<DeviceState> = StaticCell::new();

/// Main task
#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    setup_logging();

    let peripherals = initialize_esp_hal({
        let mut config = EspConfig::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    let systimer = SystemTimer::new(peripherals.SYSTIMER);
    initialize_embassy(systimer.alarm0);

    let reason = reset_reason(Cpu::ProCpu).unwrap_or(SocResetReason::ChipPowerOn);
    info!("Reset reason: {reason:?}");
    info!("Wakeup cause: {:?}", wakeup_cause());

    let storage = RtcStorage;
    let state: &'static DeviceState = DEVICE_STATE.init(DeviceState::new(storage.load()));

    info!("Create LEDs");
    let green = Output::new(peripherals.GPIO6, Level::High, OutputConfig::default());
    let red = Output::new(peripherals.GPIO7, Level::High, OutputConfig::default());
    let indicators = Indicators::new(
        Indicator::new(green, LED_POLARITY),
        Indicator::new(red, LED_POLARITY),
    );

    info!("Register button interrupt");
    let button = Input::new(
        peripherals.GPIO3,
        InputConfig::default().with_pull(Pull::Up),
    );
    let mut io = Io::new(peripherals.IO_MUX);
    button::register(&mut io, button, state);

    let sleep = RtcSleep::new(Rtc::new(peripherals.LPWR));

    let mut dispatcher = AsyncDispatcher::new(
        state,
        indicators,
        Delay,
        sleep,
        storage,
        Config::default(),
    );

    info!("Start dispatching");
    loop {
        match dispatcher.run_cycle().await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Restart) => {
                warn!("Deep sleep returned, keep running");
            }
            Err(error) => {
                error!("Error while dispatching: {error:?}");
            }
        }
    }
}
