// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Indicator lines

use log::trace;

use embedded_hal::digital::OutputPin;

use crate::Error;

/// Pin level that activates an indicator
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Polarity {
    /// Active when the pin is high
    #[default]
    ActiveHigh,

    /// Active when the pin is low, e.g. a LED wired to the supply
    ActiveLow,
}

/// An indicator driven by an output pin
pub struct Indicator<P: OutputPin> {
    /// Output pin
    pin: P,

    /// Pin level that activates the indicator
    polarity: Polarity,
}

impl<P> Indicator<P>
where
    P: OutputPin,
{
    /// Create a new indicator
    #[must_use]
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Activate or deactivate the indicator
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    pub fn set(&mut self, active: bool) -> Result<(), Error> {
        let high = match self.polarity {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        };

        if high {
            self.pin.set_high().map_err(Error::from_digital)
        } else {
            self.pin.set_low().map_err(Error::from_digital)
        }
    }

    /// Release the indicator and return the inner pin
    pub fn release(self) -> P {
        self.pin
    }
}

/// An indicator line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    /// Line used in the on mode
    Primary,

    /// Line used in the flashing mode
    Secondary,
}

/// The pair of indicators driven by the dispatcher
pub struct Indicators<PRIMARY: OutputPin, SECONDARY: OutputPin> {
    /// Primary indicator
    primary: Indicator<PRIMARY>,

    /// Secondary indicator
    secondary: Indicator<SECONDARY>,
}

impl<PRIMARY, SECONDARY> Indicators<PRIMARY, SECONDARY>
where
    PRIMARY: OutputPin,
    SECONDARY: OutputPin,
{
    /// Create a new pair of indicators
    #[must_use]
    pub fn new(primary: Indicator<PRIMARY>, secondary: Indicator<SECONDARY>) -> Self {
        Self { primary, secondary }
    }

    /// Activate or deactivate a single line
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    pub fn set_line(&mut self, line: Line, active: bool) -> Result<(), Error> {
        trace!("Set {line:?} line {}", if active { "active" } else { "inactive" });
        match line {
            Line::Primary => self.primary.set(active),
            Line::Secondary => self.secondary.set(active),
        }
    }

    /// Set both lines
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    pub fn set(&mut self, primary: bool, secondary: bool) -> Result<(), Error> {
        self.set_line(Line::Primary, primary)?;
        self.set_line(Line::Secondary, secondary)?;
        Ok(())
    }

    /// Release the indicators and return the inner pins
    pub fn release(self) -> (PRIMARY, SECONDARY) {
        (self.primary.release(), self.secondary.release())
    }
}
