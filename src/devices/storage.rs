//! Flash backed storage collaborator.
//!
//! The partition table, the OTA selection data and the erasable data
//! partitions all live in the same flash chip, so a single owner of the
//! flash driver serves all three roles. Each role is implemented in its own
//! module: [`partition`](super::partition), [`ota`](super::ota) and
//! [`eraser`](super::eraser).
pub struct FlashStorage<F> {
    pub(crate) flash: F,
}

impl<F> FlashStorage<F> {
    /// Storage over the flash chip holding the partition table.
    pub fn new(flash: F) -> Self { Self { flash } }

    /// Gives back the flash driver, e.g. to hand it over to the image loader.
    pub fn release(self) -> F { self.flash }
}
