//! Partition catalog and boot index.
//!
//! The catalog is the in-memory description of the flash regions holding
//! firmware images and data. It is loaded once per boot attempt from the
//! on-flash partition table and never mutated afterwards.
use super::storage::FlashStorage;
use crate::{error::Error, hal::flash};
use nb::block;
use static_assertions::const_assert;

/// Maximum number of OTA application slots (subtypes `ota_0` to `ota_15`).
pub const MAX_OTA_SLOTS: usize = 16;
/// Maximum number of data partitions tracked by the catalog.
pub const MAX_DATA_PARTITIONS: usize = 16;
/// Length of a partition label, NUL padded.
pub const LABEL_LENGTH: usize = 16;

const_assert!(MAX_OTA_SLOTS <= u8::MAX as usize);

/// Region of flash holding one partition. An offset of zero marks an
/// absent slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Slot {
    pub offset: u32,
    pub size: u32,
}

impl Slot {
    pub const fn new(offset: u32, size: u32) -> Self { Self { offset, size } }
    pub fn is_present(&self) -> bool { self.offset != 0 }
}

/// Category of a data partition, by partition table subtype.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum DataKind {
    /// Persisted OTA selection.
    Ota,
    Phy,
    Nvs,
    CoreDump,
    NvsKeys,
    Other(u8),
}

impl From<u8> for DataKind {
    fn from(subtype: u8) -> Self {
        match subtype {
            0x00 => DataKind::Ota,
            0x01 => DataKind::Phy,
            0x02 => DataKind::Nvs,
            0x03 => DataKind::CoreDump,
            0x04 => DataKind::NvsKeys,
            other => DataKind::Other(other),
        }
    }
}

/// Data partition descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataPartition {
    pub kind: DataKind,
    pub label: [u8; LABEL_LENGTH],
    pub slot: Slot,
}

impl DataPartition {
    pub fn new(kind: DataKind, label: &str, slot: Slot) -> Self {
        let mut raw = [0u8; LABEL_LENGTH];
        raw.iter_mut().zip(label.bytes()).for_each(|(o, i)| *o = i);
        Self { kind, label: raw, slot }
    }

    /// Label up to the first NUL, or an empty string if it isn't valid UTF-8.
    pub fn label(&self) -> &str {
        let length = self.label.iter().position(|b| *b == 0).unwrap_or(LABEL_LENGTH);
        core::str::from_utf8(&self.label[..length]).unwrap_or("")
    }
}

/// Identifies the catalog slot a boot attempt will execute.
///
/// The "no safe choice" case is never a `BootIndex`: resolution returns an
/// [`Error`] instead, which the startup routine turns into a reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum BootIndex {
    Factory,
    Test,
    Ota(u8),
}

impl BootIndex {
    pub const FACTORY_RAW: i32 = -1;
    pub const TEST_RAW: i32 = -2;
    pub const INVALID_RAW: i32 = -99;

    /// Integer view shared with C-side image loaders.
    pub fn raw(self) -> i32 {
        match self {
            BootIndex::Factory => Self::FACTORY_RAW,
            BootIndex::Test => Self::TEST_RAW,
            BootIndex::Ota(index) => index as i32,
        }
    }

    /// Integer view of a resolution, mapping any failure to the invalid sentinel.
    pub fn raw_or_invalid(resolution: Result<BootIndex, Error>) -> i32 {
        resolution.map(BootIndex::raw).unwrap_or(Self::INVALID_RAW)
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            Self::FACTORY_RAW => Some(BootIndex::Factory),
            Self::TEST_RAW => Some(BootIndex::Test),
            index if (0..MAX_OTA_SLOTS as i32).contains(&index) => Some(BootIndex::Ota(index as u8)),
            _ => None,
        }
    }
}

/// In-memory partition table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub factory: Slot,
    pub test: Slot,
    /// OTA selection data partition, if any.
    pub ota_info: Slot,
    ota: [Slot; MAX_OTA_SLOTS],
    ota_count: usize,
    data: [Option<DataPartition>; MAX_DATA_PARTITIONS],
}

impl Catalog {
    pub fn with_factory(mut self, slot: Slot) -> Self {
        self.factory = slot;
        self
    }

    pub fn with_test(mut self, slot: Slot) -> Self {
        self.test = slot;
        self
    }

    /// Registers the OTA application slot `ota_<index>`.
    pub fn with_ota(mut self, index: u8, slot: Slot) -> Self {
        self.set_ota(index, slot);
        self
    }

    /// Registers a data partition. The first OTA data partition also
    /// becomes the catalog's OTA selection data.
    pub fn with_data(mut self, partition: DataPartition) -> Result<Self, Error> {
        self.push_data(partition)?;
        Ok(self)
    }

    fn set_ota(&mut self, index: u8, slot: Slot) {
        let index = index as usize % MAX_OTA_SLOTS;
        match (self.ota[index].is_present(), slot.is_present()) {
            (false, true) => self.ota_count += 1,
            (true, false) => self.ota_count -= 1,
            _ => (),
        }
        self.ota[index] = slot;
    }

    /// Whether any application image (factory, test or OTA) is present.
    pub fn has_app(&self) -> bool {
        self.factory.is_present() || self.test.is_present() || self.ota_count > 0
    }

    fn push_data(&mut self, partition: DataPartition) -> Result<(), Error> {
        let free = self
            .data
            .iter_mut()
            .find(|entry| entry.is_none())
            .ok_or(Error::PartitionTableOverflow)?;
        *free = Some(partition);
        if partition.kind == DataKind::Ota && !self.ota_info.is_present() {
            self.ota_info = partition.slot;
        }
        Ok(())
    }

    /// Number of OTA application slots present.
    pub fn ota_count(&self) -> usize { self.ota_count }

    pub fn ota(&self, index: u8) -> Option<Slot> {
        self.ota.get(index as usize).copied().filter(Slot::is_present)
    }

    pub fn data_partitions(&self) -> impl Iterator<Item = &DataPartition> {
        self.data.iter().flatten()
    }

    /// Slot behind a boot index, if present.
    pub fn slot(&self, index: BootIndex) -> Option<Slot> {
        match index {
            BootIndex::Factory => Some(self.factory),
            BootIndex::Test => Some(self.test),
            BootIndex::Ota(index) => self.ota(index),
        }
        .filter(Slot::is_present)
    }
}

/// Loads the partition catalog for the current boot attempt.
pub trait LoadCatalog {
    fn load_catalog(&mut self) -> Result<Catalog, Error>;
}

/// Default location of the partition table in flash.
pub const TABLE_OFFSET: u32 = 0x8000;
/// Maximum length of the partition table.
pub const TABLE_MAX_LENGTH: usize = 0xC00;
/// Size of a single partition table entry.
pub const ENTRY_SIZE: usize = 32;

const_assert!(TABLE_MAX_LENGTH % ENTRY_SIZE == 0);

const ENTRY_MAGIC: u16 = 0x50AA;
const MD5_MAGIC: u16 = 0xEBEB;
const ERASED_MAGIC: u16 = 0xFFFF;

const TYPE_APP: u8 = 0x00;
const TYPE_DATA: u8 = 0x01;

const SUBTYPE_FACTORY: u8 = 0x00;
const SUBTYPE_OTA_FIRST: u8 = 0x10;
const SUBTYPE_OTA_LAST: u8 = SUBTYPE_OTA_FIRST + MAX_OTA_SLOTS as u8 - 1;
const SUBTYPE_TEST: u8 = 0x20;

/// Reads the binary partition table: a sequence of 32 byte entries (magic,
/// type, subtype, offset, size, label, flags; little endian), terminated by
/// erased flash or by the MD5 entry. The MD5 digest itself is not verified.
/// A table without entries, or without any application partition, counts as
/// missing.
impl<F: flash::Read> LoadCatalog for FlashStorage<F>
where
    Error: From<F::Error>,
{
    fn load_catalog(&mut self) -> Result<Catalog, Error> {
        let mut catalog = Catalog::default();
        let mut entry = [0u8; ENTRY_SIZE];
        let mut entries = 0usize;

        for position in (0..TABLE_MAX_LENGTH).step_by(ENTRY_SIZE) {
            block!(self.flash.read(TABLE_OFFSET + position as u32, &mut entry))?;
            match u16::from_le_bytes([entry[0], entry[1]]) {
                ENTRY_MAGIC => (),
                ERASED_MAGIC | MD5_MAGIC => break,
                _ => {
                    error!("Invalid partition table magic at entry {}", position / ENTRY_SIZE);
                    return Err(Error::PartitionTableCorrupted);
                }
            }

            entries += 1;
            let (kind, subtype) = (entry[2], entry[3]);
            let slot = Slot::new(word(&entry[4..8]), word(&entry[8..12]));
            let mut label = [0u8; LABEL_LENGTH];
            label.copy_from_slice(&entry[12..12 + LABEL_LENGTH]);

            match (kind, subtype) {
                (TYPE_APP, SUBTYPE_FACTORY) => catalog.factory = slot,
                (TYPE_APP, SUBTYPE_TEST) => catalog.test = slot,
                (TYPE_APP, SUBTYPE_OTA_FIRST..=SUBTYPE_OTA_LAST) => {
                    catalog.set_ota(subtype - SUBTYPE_OTA_FIRST, slot)
                }
                (TYPE_DATA, subtype) => {
                    catalog.push_data(DataPartition { kind: subtype.into(), label, slot })?
                }
                _ => warn!("Ignoring unknown partition type {} subtype {}", kind, subtype),
            }
        }

        if entries == 0 {
            error!("Partition table is missing");
            return Err(Error::PartitionTableCorrupted);
        }
        if !catalog.has_app() {
            error!("Partition table has no application partition");
            return Err(Error::PartitionTableCorrupted);
        }
        Ok(catalog)
    }
}

fn word(bytes: &[u8]) -> u32 { u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) }
