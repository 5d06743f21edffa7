//! Boot configuration.
//!
//! Override branches are enabled through configuration values rather than
//! conditional compilation. A disabled variant carries no pin, so a
//! disabled branch has nothing to sample and nothing to erase.
//!
//! The constant selected at build time is generated by the build script
//! from the `CAIRN_CONFIG` environment variable (see `cairn_config`).
pub use crate::{
    devices::eraser::EraseRequest,
    hal::{gpio::PinId, time::Milliseconds},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FactoryReset {
    Enabled { pin: PinId, erase: EraseRequest },
    Disabled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TestFirmware {
    Enabled { pin: PinId },
    Disabled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BootConfig {
    /// Pin driven low before anything else happens.
    pub strap_pin: PinId,
    /// Minimum hold time for any override button.
    pub hold_time: Milliseconds,
    pub factory_reset: FactoryReset,
    pub test_firmware: TestFirmware,
}

impl BootConfig {
    /// Configuration with every override disabled.
    pub const fn plain(strap_pin: PinId, hold_time: Milliseconds) -> Self {
        Self {
            strap_pin,
            hold_time,
            factory_reset: FactoryReset::Disabled,
            test_firmware: TestFirmware::Disabled,
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/boot_configuration.rs"));
