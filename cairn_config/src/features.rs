use serde::{Deserialize, Serialize};

/// Button-triggered factory reset: erases the listed data partitions and
/// falls back to the factory image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FactoryReset {
    Enabled {
        pin: u8,
        /// Also erase the OTA selection data, so the factory image becomes
        /// the default again.
        erase_ota_state: bool,
        /// Labels of the data partitions to erase, separated by commas or spaces.
        erase_categories: String,
    },
    Disabled,
}

impl Default for FactoryReset {
    fn default() -> Self { FactoryReset::Disabled }
}

impl FactoryReset {
    pub fn enabled(&self) -> bool { matches!(self, FactoryReset::Enabled { .. }) }

    pub fn pin(&self) -> Option<u8> {
        match self {
            FactoryReset::Enabled { pin, .. } => Some(*pin),
            FactoryReset::Disabled => None,
        }
    }
}

/// Button-triggered boot into the test firmware partition.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub enum TestFirmware {
    Enabled { pin: u8 },
    Disabled,
}

impl Default for TestFirmware {
    fn default() -> Self { TestFirmware::Disabled }
}

impl TestFirmware {
    pub fn enabled(&self) -> bool { matches!(self, TestFirmware::Enabled { .. }) }

    pub fn pin(&self) -> Option<u8> {
        match self {
            TestFirmware::Enabled { pin } => Some(*pin),
            TestFirmware::Disabled => None,
        }
    }
}
