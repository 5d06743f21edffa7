//! # Pin level GPIO interface
//!
//! The boot decision layer addresses pins by number, as they come out of
//! the build configuration. Drivers implement [`PinBank`] over the whole GPIO
//! peripheral so any configured pin can be reached without typestates.

/// GPIO number, as numbered by the target's pin mux.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Raw access to the GPIO peripheral, addressed by pin number.
pub trait PinBank {
    /// Routes the pin to the GPIO function, enables its output driver and
    /// drives it low.
    fn configure_output_low(&mut self, pin: PinId);
    /// Routes the pin to the GPIO function as an input with the internal
    /// pull-up enabled.
    fn configure_input_pullup(&mut self, pin: PinId);
    fn is_low(&mut self, pin: PinId) -> bool;
}
