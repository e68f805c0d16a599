// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Interface to low-power sleep primitives

/// Level of the button line that wakes the device up
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WakeupLevel {
    /// Wake up while the line is low, i.e. while a pulled-up button is pressed
    #[default]
    Low,

    /// Wake up while the line is high
    High,
}

/// Low-power sleep primitives
pub trait Sleep {
    /// Enter light sleep until the button line reaches the wakeup level
    ///
    /// Execution state is preserved, and this function returns on wakeup.
    fn enter_light(&mut self, level: WakeupLevel);

    /// Enter deep sleep until the button line reaches the wakeup level
    ///
    /// On hardware this never returns: the device restarts from its entry
    /// point and only retained memory survives.
    /// Simulations may return, the dispatcher then reports
    /// [`Outcome::Restart`].
    fn enter_deep(&mut self, level: WakeupLevel);
}

impl<T: Sleep + ?Sized> Sleep for &mut T {
    fn enter_light(&mut self, level: WakeupLevel) {
        T::enter_light(self, level);
    }

    fn enter_deep(&mut self, level: WakeupLevel) {
        T::enter_deep(self, level);
    }
}

/// The result of a dispatcher cycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Run the next cycle
    Continue,

    /// The device went through deep sleep
    ///
    /// The caller must restart from the entry point, restoring the state from
    /// the retained storage.
    Restart,
}
