// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! State retained across deep sleep

/// Marker for an encoded retained state
const MAGIC: u8 = 0xa5;

/// Flag for a fired light-sleep guard
const LIGHT_SLEEP_FIRED: u8 = 0b0000_0001;

/// Flag for a fired deep-sleep guard
const DEEP_SLEEP_FIRED: u8 = 0b0000_0010;

/// A re-entry latch for a sleep mode
///
/// A guard starts armed.
/// Entering its sleep mode fires it, so that the next dispatcher cycle after
/// waking up does not immediately go back to sleep.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SleepGuard {
    /// Whether the sleep mode was already entered
    fired: bool,
}

impl SleepGuard {
    /// Create an armed guard
    #[must_use]
    pub const fn armed() -> Self {
        Self { fired: false }
    }

    /// Create a fired guard
    #[must_use]
    pub const fn fired() -> Self {
        Self { fired: true }
    }

    /// Check whether the sleep mode may still be entered
    #[must_use]
    pub const fn is_armed(self) -> bool {
        !self.fired
    }

    /// Check whether the sleep mode was already entered
    #[must_use]
    pub const fn is_fired(self) -> bool {
        self.fired
    }

    /// Block further entries into the sleep mode
    pub fn fire(&mut self) {
        self.fired = true;
    }

    /// Allow entering the sleep mode again
    pub fn clear(&mut self) {
        self.fired = false;
    }
}

/// The state stored in power-retained memory
///
/// Values are neither validated nor clamped here, the dispatcher decides what
/// an out-of-range counter means.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RetainedState {
    /// The persisted press counter
    counter: u8,

    /// Guard for light sleep
    light_sleep: SleepGuard,

    /// Guard for deep sleep
    deep_sleep: SleepGuard,
}

impl RetainedState {
    /// Size of the encoded state in bytes
    pub const SIZE: usize = 4;

    /// Create a retained state
    #[must_use]
    pub const fn new(counter: u8, light_sleep: SleepGuard, deep_sleep: SleepGuard) -> Self {
        Self {
            counter,
            light_sleep,
            deep_sleep,
        }
    }

    /// Return the persisted press counter
    #[must_use]
    pub const fn counter(&self) -> u8 {
        self.counter
    }

    /// Set the persisted press counter
    pub fn set_counter(&mut self, counter: u8) {
        self.counter = counter;
    }

    /// Return the light-sleep guard
    #[must_use]
    pub const fn light_sleep(&self) -> SleepGuard {
        self.light_sleep
    }

    /// Return a mutable reference to the light-sleep guard
    pub fn light_sleep_mut(&mut self) -> &mut SleepGuard {
        &mut self.light_sleep
    }

    /// Return the deep-sleep guard
    #[must_use]
    pub const fn deep_sleep(&self) -> SleepGuard {
        self.deep_sleep
    }

    /// Return a mutable reference to the deep-sleep guard
    pub fn deep_sleep_mut(&mut self) -> &mut SleepGuard {
        &mut self.deep_sleep
    }

    /// Encode to bytes
    ///
    /// The layout is `[magic, counter, flags, checksum]`.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut flags = 0;
        if self.light_sleep.is_fired() {
            flags |= LIGHT_SLEEP_FIRED;
        }
        if self.deep_sleep.is_fired() {
            flags |= DEEP_SLEEP_FIRED;
        }
        [MAGIC, self.counter, flags, MAGIC ^ self.counter ^ flags]
    }

    /// Decode from bytes
    ///
    /// Returns `None` when the bytes do not contain a valid state, as in
    /// freshly initialized memory.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::SIZE]) -> Option<Self> {
        let [magic, counter, flags, checksum] = bytes;

        if magic != MAGIC
            || checksum != magic ^ counter ^ flags
            || flags & !(LIGHT_SLEEP_FIRED | DEEP_SLEEP_FIRED) != 0
        {
            return None;
        }

        Some(Self {
            counter,
            light_sleep: SleepGuard {
                fired: flags & LIGHT_SLEEP_FIRED != 0,
            },
            deep_sleep: SleepGuard {
                fired: flags & DEEP_SLEEP_FIRED != 0,
            },
        })
    }
}

/// A storage for the retained state
///
/// Implementations are expected to survive light and deep sleep, but not a
/// full power loss.
pub trait RetainedStorage {
    /// Load the stored state, or the default state if nothing was stored
    fn load(&self) -> RetainedState;

    /// Store a state, overwriting the previous one
    fn save(&mut self, state: &RetainedState);
}

impl<T: RetainedStorage + ?Sized> RetainedStorage for &mut T {
    fn load(&self) -> RetainedState {
        T::load(self)
    }

    fn save(&mut self, state: &RetainedState) {
        T::save(self, state);
    }
}

/// A storage keeping the encoded state in ordinary memory
///
/// Useful for simulating deep sleep: save the state, drop everything else,
/// load the state again.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    /// Encoded state, all zeros when empty
    bytes: [u8; RetainedState::SIZE],
}

impl MemoryStorage {
    /// Create an empty storage
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; RetainedState::SIZE],
        }
    }

    /// Return the raw encoded bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; RetainedState::SIZE] {
        &self.bytes
    }
}

impl RetainedStorage for MemoryStorage {
    fn load(&self) -> RetainedState {
        RetainedState::from_bytes(self.bytes).unwrap_or_default()
    }

    fn save(&mut self, state: &RetainedState) {
        self.bytes = state.to_bytes();
    }
}
