//! Time units.
use core::ops::{Add as Adds, Sub as Subtracts};

/// Abstract point in time. Useful for time periods
///
/// Any implementer of Instant can be subtracted with
/// itself to obtain a span of milliseconds.
///
/// Any implementer of Instant can be added with
/// milliseconds to obtain another instant.
pub trait Instant
where
    Self: Copy + Clone,
    Self: Subtracts<Output = Milliseconds>,
    Self: Adds<Milliseconds, Output = Self>,
{
}

/// Monotonic clock source.
pub trait Now {
    type I: Instant;
    fn now(&self) -> Self::I;
}

#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Eq, Ord)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Milliseconds(pub u32);
