//! Modules with the boot decision logic, laid on top of abstract
//! drivers. Devices are generic, while board specifics (pins, flash
//! layout, jump mechanics) are handled in the `ports` module.

pub mod boot;
pub mod boot_mode;
pub mod eraser;
pub mod ota;
pub mod partition;
pub mod signal;
pub mod startup;
pub mod storage;

#[cfg(test)]
pub(crate) mod doubles;

/// General purpose traits that summarize requirements on devices.
pub mod traits {
    use super::{eraser::EraseData, ota::SelectDefault, partition::LoadCatalog};
    use marker_blanket::marker_blanket;

    /// Everything the startup sequence needs from the flash holding the
    /// partition table and the data partitions.
    #[marker_blanket]
    pub trait Storage: LoadCatalog + SelectDefault + EraseData {}
}
