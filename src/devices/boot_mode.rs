//! Boot mode resolution.
//!
//! Picks the partition to boot from the persisted OTA selection, unless a
//! hardware override is held. Overrides are evaluated in a fixed order and
//! the first one held wins; later overrides are not even sampled:
//!
//! 1. Factory reset: erase the configured data partitions, then look the
//!    default up again (a wiped OTA selection falls back to factory).
//! 2. Test firmware: boot the test partition, or fail if there is none.
//!
//! If the default lookup itself fails, no override is evaluated at all.
use super::{
    eraser::{EraseData, EraseRequest},
    ota::SelectDefault,
    partition::{BootIndex, Catalog},
    signal::Signals,
};
use crate::{
    configuration::{BootConfig, FactoryReset, TestFirmware},
    error::Error,
    hal::gpio::PinId,
};

/// Hardware override of the default boot selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Override {
    FactoryReset(EraseRequest),
    TestFirmware,
}

/// Enabled overrides and the pins that trigger them, in precedence order:
/// factory reset, then test firmware.
pub fn overrides(config: &BootConfig) -> impl Iterator<Item = (PinId, Override)> {
    let factory_reset = match config.factory_reset {
        FactoryReset::Enabled { pin, erase } => Some((pin, Override::FactoryReset(erase))),
        FactoryReset::Disabled => None,
    };
    let test_firmware = match config.test_firmware {
        TestFirmware::Enabled { pin } => Some((pin, Override::TestFirmware)),
        TestFirmware::Disabled => None,
    };
    factory_reset.into_iter().chain(test_firmware)
}

/// Boot mode resolver. Holds no state between resolutions besides its
/// collaborators, so resolving twice against unchanged inputs yields the
/// same index.
pub struct BootMode<S: Signals, P: SelectDefault + EraseData> {
    pub(crate) config: BootConfig,
    pub(crate) signals: S,
    pub(crate) partitions: P,
}

impl<S: Signals, P: SelectDefault + EraseData> BootMode<S, P> {
    pub fn new(config: BootConfig, signals: S, partitions: P) -> Self {
        Self { config, signals, partitions }
    }

    /// Resolves the partition to boot. Any error means there is no safe
    /// choice for this boot attempt.
    pub fn resolve(&mut self, catalog: &Catalog) -> Result<BootIndex, Error> {
        let default = match self.partitions.default_boot_index(catalog) {
            Ok(index) => index,
            Err(e) => {
                error!("Default boot partition could not be determined");
                return Err(e);
            }
        };

        match self.detect_override() {
            Some(detected) => self.apply(detected, catalog),
            None => Ok(default),
        }
    }

    /// First held override in precedence order. Overrides after it are not
    /// sampled.
    pub fn detect_override(&mut self) -> Option<Override> {
        let hold_time = self.config.hold_time;
        let signals = &mut self.signals;
        overrides(&self.config)
            .find(|(pin, _)| signals.check_hold(*pin, hold_time))
            .map(|(_, detected)| detected)
    }

    fn apply(&mut self, detected: Override, catalog: &Catalog) -> Result<BootIndex, Error> {
        match detected {
            Override::FactoryReset(request) => {
                info!("Detected a factory reset request");
                info!("Data partitions to erase: {}", request.categories);
                if !self.partitions.erase_data(catalog, &request) {
                    // Non-fatal, the boot goes on with the new default.
                    error!("Not all partitions were erased");
                }
                self.partitions.default_boot_index(catalog)
            }
            Override::TestFirmware => {
                info!("Detected a request to boot the test firmware");
                if catalog.test.is_present() {
                    Ok(BootIndex::Test)
                } else {
                    error!("Test firmware is not found in partition table");
                    Err(Error::TestPartitionMissing)
                }
            }
        }
    }
}
