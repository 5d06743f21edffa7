//! Signal detector: button-hold override signals on GPIO lines.
//!
//! Override buttons pull their line to ground when pressed, so the lines
//! are sampled as pulled-up inputs and "asserted" means "low".
use crate::hal::{
    gpio::{PinBank, PinId},
    time::{Milliseconds, Now},
};

/// Narrow capability over the GPIO peripheral. This is all the boot
/// decision layer is allowed to do with pins.
pub trait Signals {
    /// Configures the pin as an output and drives it low.
    fn assert_low(&mut self, pin: PinId);
    /// Whether the pin has been held asserted for at least `duration`.
    fn check_hold(&mut self, pin: PinId, duration: Milliseconds) -> bool;
}

/// Classification of a button hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum HoldOutcome {
    /// The pin wasn't asserted when first sampled.
    NotHeld,
    /// The pin was released before the hold duration elapsed.
    ShortHold,
    /// The pin stayed asserted for the full hold duration.
    LongHold,
}

/// [`Signals`] implemented over a raw pin bank and a monotonic clock.
pub struct GpioSignals<B: PinBank, C: Now> {
    bank: B,
    clock: C,
}

impl<B: PinBank, C: Now> GpioSignals<B, C> {
    pub fn new(bank: B, clock: C) -> Self { Self { bank, clock } }

    /// Samples a pin until it is released or `duration` has elapsed. The
    /// wait is bounded by `duration` as long as the clock advances.
    pub fn hold_outcome(&mut self, pin: PinId, duration: Milliseconds) -> HoldOutcome {
        self.bank.configure_input_pullup(pin);
        if !self.bank.is_low(pin) {
            return HoldOutcome::NotHeld;
        }

        let start = self.clock.now();
        while self.bank.is_low(pin) {
            if self.clock.now() - start >= duration {
                return HoldOutcome::LongHold;
            }
        }
        HoldOutcome::ShortHold
    }

    pub fn release(self) -> (B, C) { (self.bank, self.clock) }
}

impl<B: PinBank, C: Now> Signals for GpioSignals<B, C> {
    fn assert_low(&mut self, pin: PinId) { self.bank.configure_output_low(pin); }

    fn check_hold(&mut self, pin: PinId, duration: Milliseconds) -> bool {
        self.hold_outcome(pin, duration) == HoldOutcome::LongHold
    }
}
