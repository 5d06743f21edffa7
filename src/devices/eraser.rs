//! Data eraser: wipes data partitions by category label on factory reset.
use super::{
    partition::{Catalog, DataKind},
    storage::FlashStorage,
};
use crate::{error::Error, hal::flash};
use nb::block;

/// Data partitions a factory reset wipes. Built once from the boot
/// configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct EraseRequest {
    /// Partition labels, separated by commas and/or spaces (e.g. `"nvs, phy_init"`).
    pub categories: &'static str,
    /// Also wipe the OTA selection data, so the default falls back to factory.
    pub erase_ota_state: bool,
}

impl EraseRequest {
    /// Whether a partition label is one of the requested categories.
    pub fn names(&self, label: &str) -> bool {
        !label.is_empty()
            && self.categories.split(|c: char| c == ',' || c == ' ').any(|token| token == label)
    }
}

/// Erases the data partitions named by an erase request.
pub trait EraseData {
    /// Returns `false` if any requested partition failed to erase. Erasure is
    /// attempted on every matching partition regardless of earlier failures.
    fn erase_data(&mut self, catalog: &Catalog, request: &EraseRequest) -> bool;
}

impl<F: flash::EraseRegion> EraseData for FlashStorage<F>
where
    Error: From<F::Error>,
{
    fn erase_data(&mut self, catalog: &Catalog, request: &EraseRequest) -> bool {
        let mut all_erased = true;
        for partition in catalog.data_partitions() {
            let wipes_ota_state = request.erase_ota_state && partition.kind == DataKind::Ota;
            if !(wipes_ota_state || request.names(partition.label())) {
                continue;
            }

            info!("Erasing data partition {} at {}", partition.label(), partition.slot.offset);
            if let Err(e) = block!(self.flash.erase_region(partition.slot.offset, partition.slot.size)) {
                Error::from(e).report();
                error!("Failed to erase data partition {}", partition.label());
                all_erased = false;
            }
        }
        all_erased
    }
}
