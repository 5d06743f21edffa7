//! Image hand-off and reset for Cortex-M targets with memory mapped flash.
use crate::{
    devices::{
        boot::{LoadImage, Reset},
        partition::{BootIndex, Catalog},
    },
    error::Error,
};
use core::mem::size_of;
use cortex_m::peripheral::SCB;

/// Reset through the system control block.
pub struct SystemReset;

impl Reset for SystemReset {
    fn reset(&mut self) -> ! { SCB::sys_reset() }
}

/// Boots images that start with a Cortex-M vector table, at their flash
/// offset relative to the base of the memory mapped flash window.
pub struct VectorTableLoader {
    pub memory_map_base: usize,
}

impl LoadImage for VectorTableLoader {
    fn load_and_run(&mut self, catalog: &Catalog, index: BootIndex) -> ! {
        let slot = match catalog.slot(index) {
            Some(slot) => slot,
            None => {
                Error::SlotMissing.report();
                error!("Cannot boot partition {:?}", index);
                SCB::sys_reset()
            }
        };

        warn!("Jumping to a new firmware image. This will break `defmt`.");
        let image_location_raw = self.memory_map_base + slot.offset as usize;

        // NOTE(Safety): Thoroughly unsafe operations, for obvious reasons: We are jumping to an
        // entirely different firmware image! We have to assume everything is at the right place,
        // or literally anything could happen here. After the interrupts are disabled, there is
        // no turning back.
        unsafe {
            let initial_stack_pointer = *(image_location_raw as *const u32);
            let reset_handler_pointer =
                *((image_location_raw + size_of::<u32>()) as *const u32) as *const ();
            let reset_handler = core::mem::transmute::<*const (), fn() -> !>(reset_handler_pointer);
            cortex_m::interrupt::disable();
            (*SCB::ptr()).vtor.write(image_location_raw as u32);
            #[allow(deprecated)]
            cortex_m::register::msp::write(initial_stack_pointer);
            reset_handler()
        }
    }
}
