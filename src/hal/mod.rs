//! Hardware Abstraction Layer, containing the narrow interfaces the
//! boot decision layer needs from low level drivers.
#![macro_use]

pub mod flash;
pub mod gpio;
pub mod time;

#[cfg(not(target_arch = "arm"))]
#[doc(hidden)]
pub mod doubles;
