//! Minimal flash interface: reads and erases addressed by byte offset from
//! the start of the flash chip.
use core::fmt;

/// Reads a range of bytes at a flash offset.
pub trait Read {
    type Error: Clone + Copy + fmt::Debug;
    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> nb::Result<(), Self::Error>;
}

/// Erases (sets to 0xFF) a range of flash. Drivers are responsible for
/// splitting the range into sectors.
pub trait EraseRegion: Read {
    fn erase_region(&mut self, offset: u32, size: u32) -> nb::Result<(), Self::Error>;
}
