//! Logging macros for the boot mode resolver.
//!
//! Firmware builds log through `defmt`; host builds (tests, simulators)
//! go through the `log` facade. Format strings must stick to `{}` and
//! `{:?}` so they are valid for both backends.
#![macro_use]

macro_rules! info {
    ($($arg:tt)+) => {{
        #[cfg(target_arch = "arm")]
        defmt::info!($($arg)+);
        #[cfg(not(target_arch = "arm"))]
        log::info!($($arg)+);
    }};
}

macro_rules! warn {
    ($($arg:tt)+) => {{
        #[cfg(target_arch = "arm")]
        defmt::warn!($($arg)+);
        #[cfg(not(target_arch = "arm"))]
        log::warn!($($arg)+);
    }};
}

macro_rules! error {
    ($($arg:tt)+) => {{
        #[cfg(target_arch = "arm")]
        defmt::error!($($arg)+);
        #[cfg(not(target_arch = "arm"))]
        log::error!($($arg)+);
    }};
}
