//! Error types and methods for the boot mode resolver.

/// Top level error type for the boot decision layer. Unlike the specific
/// driver errors, this error carries a textual description of the problem,
/// as it is meant to be reported directly through the log before resetting.
///
/// Every variant is fatal to the current boot attempt: the startup routine
/// turns any of them into a hardware reset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Error {
    /// Error caused by a low level peripheral driver
    DriverError(&'static str),
    /// Error caused by a high level device driver
    DeviceError(&'static str),
    HardwareInitFailed,
    PartitionTableCorrupted,
    PartitionTableOverflow,
    OtaStateUnreadable,
    NoBootablePartition,
    TestPartitionMissing,
    SlotMissing,
}

/// Implemented by driver errors that can be surfaced as a top level [`Error`].
pub trait Convertible {
    fn into(self) -> Error;
}

impl<T: Convertible> From<T> for Error {
    fn from(t: T) -> Self { t.into() }
}

impl Error {
    /// Reports the error through the log.
    pub fn report(&self) {
        match self {
            Error::DriverError(text) => error!("[Driver Error] -> {}", text),
            Error::DeviceError(text) => error!("[Device Error] -> {}", text),
            Error::HardwareInitFailed => {
                error!("[Hardware Error] -> Hardware initialization failed")
            }
            Error::PartitionTableCorrupted => {
                error!("[Logic Error] -> Partition table is missing or corrupted")
            }
            Error::PartitionTableOverflow => {
                error!("[Logic Error] -> Partition table has more entries than supported")
            }
            Error::OtaStateUnreadable => {
                error!("[Logic Error] -> OTA selection data could not be read")
            }
            Error::NoBootablePartition => {
                error!("[Logic Error] -> No bootable partition could be selected")
            }
            Error::TestPartitionMissing => {
                error!("[Logic Error] -> Test firmware is not found in partition table")
            }
            Error::SlotMissing => {
                error!("[Logic Error] -> Selected partition doesn't exist in the catalog")
            }
        }
    }

    /// Whether the error originates in a driver rather than in the boot policy.
    pub fn is_driver_error(&self) -> bool {
        matches!(self, Error::DriverError(_) | Error::DeviceError(_))
    }
}
