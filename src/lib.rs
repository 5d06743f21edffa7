//! # Boot Mode Resolution Library
//!
//! This crate contains the decision layer of a second stage bootloader:
//! given the partition catalog, the persisted OTA selection and a handful
//! of button-hold override signals, it picks exactly one partition to boot,
//! applies any factory reset the selection implies, and hands control to
//! the image loader. Any unrecoverable condition ends in a hardware reset.
#![cfg_attr(test, allow(unused_imports))]
#![cfg_attr(target_arch = "arm", no_std)]

extern crate static_assertions;

#[macro_use]
pub mod utilities {
    mod macros;
}

pub mod configuration;
pub mod devices;
pub mod error;
pub mod hal;

#[cfg(target_arch = "arm")]
pub mod ports;
