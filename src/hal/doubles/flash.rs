use super::error::FakeError;
use crate::hal::flash;
use std::vec::Vec;

/// RAM backed flash. Unwritten bytes read back erased (0xFF), like real NOR flash.
#[derive(Clone, Debug)]
pub struct FakeFlash {
    pub data: Vec<u8>,
    pub erased: Vec<(u32, u32)>,
    pub failing_reads: bool,
    /// Erasing a region starting at one of these offsets fails.
    pub failing_erases: Vec<u32>,
}

impl FakeFlash {
    pub fn new(length: usize) -> FakeFlash {
        FakeFlash {
            data: vec![0xFF; length],
            erased: Vec::new(),
            failing_reads: false,
            failing_erases: Vec::new(),
        }
    }

    pub fn program(&mut self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl flash::Read for FakeFlash {
    type Error = FakeError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> nb::Result<(), Self::Error> {
        let start = offset as usize;
        if self.failing_reads || start + bytes.len() > self.data.len() {
            return Err(nb::Error::Other(FakeError));
        }
        bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
        Ok(())
    }
}

impl flash::EraseRegion for FakeFlash {
    fn erase_region(&mut self, offset: u32, size: u32) -> nb::Result<(), Self::Error> {
        let (start, end) = (offset as usize, (offset + size) as usize);
        if self.failing_erases.contains(&offset) || end > self.data.len() {
            return Err(nb::Error::Other(FakeError));
        }
        self.data[start..end].iter_mut().for_each(|b| *b = 0xFF);
        self.erased.push((offset, size));
        Ok(())
    }
}
