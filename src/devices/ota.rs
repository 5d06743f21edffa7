//! OTA resolver: turns the persisted OTA selection into the default boot index.
//!
//! The OTA data partition holds two select entries, one per flash sector,
//! written alternately by the update mechanism. The valid entry with the
//! highest sequence number designates the active OTA slot.
use super::{
    partition::{BootIndex, Catalog},
    storage::FlashStorage,
};
use crate::{error::Error, hal::flash};
use crc::crc32;
use nb::block;
use static_assertions::const_assert_eq;

/// Distance between the two OTA select entries.
pub const SELECT_ENTRY_SECTOR: u32 = 0x1000;
/// Size in bytes of a raw OTA select entry.
pub const SELECT_ENTRY_SIZE: usize = 32;
const SEQ_LABEL_LENGTH: usize = 20;

const_assert_eq!(SELECT_ENTRY_SIZE, 4 + SEQ_LABEL_LENGTH + 4 + 4);

/// Returns the partition currently designated active by persisted OTA state.
pub trait SelectDefault {
    /// Fails when the OTA state is unreadable or points nowhere bootable.
    fn default_boot_index(&mut self, catalog: &Catalog) -> Result<BootIndex, Error>;
}

/// Image state recorded alongside an OTA selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageState {
    New,
    PendingVerify,
    Valid,
    Invalid,
    Aborted,
    Undefined,
}

impl From<u32> for ImageState {
    fn from(raw: u32) -> Self {
        match raw {
            0 => ImageState::New,
            1 => ImageState::PendingVerify,
            2 => ImageState::Valid,
            3 => ImageState::Invalid,
            4 => ImageState::Aborted,
            _ => ImageState::Undefined,
        }
    }
}

/// Decoded OTA select entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectEntry {
    pub seq: u32,
    pub state: ImageState,
    pub crc: u32,
}

impl SelectEntry {
    pub fn from_bytes(raw: &[u8; SELECT_ENTRY_SIZE]) -> Self {
        let word = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        Self {
            seq: word(0),
            state: word(4 + SEQ_LABEL_LENGTH).into(),
            crc: word(4 + SEQ_LABEL_LENGTH + 4),
        }
    }

    /// CRC protecting the sequence number.
    pub fn checksum(seq: u32) -> u32 {
        crc32::update(u32::MAX, &crc32::IEEE_TABLE, &seq.to_le_bytes())
    }

    /// Erased, corrupted or explicitly rejected entries don't select anything.
    pub fn is_valid(&self) -> bool {
        self.seq != u32::MAX
            && !matches!(self.state, ImageState::Invalid | ImageState::Aborted)
            && self.crc == Self::checksum(self.seq)
    }
}

impl<F: flash::Read> FlashStorage<F>
where
    Error: From<F::Error>,
{
    fn select_entry(&mut self, offset: u32) -> Result<SelectEntry, Error> {
        let mut raw = [0u8; SELECT_ENTRY_SIZE];
        block!(self.flash.read(offset, &mut raw))?;
        Ok(SelectEntry::from_bytes(&raw))
    }
}

impl<F: flash::Read> SelectDefault for FlashStorage<F>
where
    Error: From<F::Error>,
{
    fn default_boot_index(&mut self, catalog: &Catalog) -> Result<BootIndex, Error> {
        if !catalog.ota_info.is_present() {
            info!("No OTA data partition");
            return fallback(catalog);
        }

        let offset = catalog.ota_info.offset;
        let entries = match (self.select_entry(offset), self.select_entry(offset + SELECT_ENTRY_SECTOR)) {
            (Ok(first), Ok(second)) => [first, second],
            (Err(e), _) | (_, Err(e)) => {
                e.report();
                error!("OTA data partition could not be read");
                return Err(Error::OtaStateUnreadable);
            }
        };

        let active = entries.iter().filter(|e| e.is_valid()).max_by_key(|e| e.seq);
        match active {
            Some(entry) if catalog.ota_count() > 0 => {
                let index = (entry.seq.wrapping_sub(1) % catalog.ota_count() as u32) as u8;
                if catalog.ota(index).is_none() {
                    error!("OTA data selects slot {} which is not in the partition table", index);
                    return Err(Error::NoBootablePartition);
                }
                info!("OTA data selects slot {} (sequence {})", index, entry.seq);
                Ok(BootIndex::Ota(index))
            }
            _ => {
                info!("No valid OTA selection");
                fallback(catalog)
            }
        }
    }
}

/// Default when no OTA selection applies: factory, else the first OTA slot.
fn fallback(catalog: &Catalog) -> Result<BootIndex, Error> {
    if catalog.factory.is_present() {
        info!("Defaulting to factory image");
        Ok(BootIndex::Factory)
    } else if catalog.ota(0).is_some() {
        info!("No factory image, trying OTA 0");
        Ok(BootIndex::Ota(0))
    } else {
        error!("No factory image or OTA 0 to fall back to");
        Err(Error::NoBootablePartition)
    }
}
