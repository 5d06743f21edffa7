//! This cairn sub-crate contains the build-time boot configuration and the
//! code generation that turns it into a `BootConfig` constant.
//!
//! NOTE: This code is not included anywhere from cairn itself! This is a
//! dependency of the cairn **build script**. The build script parses the
//! configuration, validates it and emits the constant that cairn includes.

use std::fmt::Display;

use features::{FactoryReset, TestFirmware};
use serde::{Deserialize, Serialize};

pub mod codegen;
pub mod features;

/// Hold time applied to override buttons when none is configured.
pub const DEFAULT_HOLD_TIME_MS: u32 = 5_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// GPIO driven low as the very first action of the bootloader.
    pub strap_pin: u8,
    /// Minimum time an override button must be held to be honored.
    pub hold_time_ms: u32,
    pub factory_reset: FactoryReset,
    pub test_firmware: TestFirmware,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            strap_pin: 0,
            hold_time_ms: DEFAULT_HOLD_TIME_MS,
            factory_reset: FactoryReset::default(),
            test_firmware: TestFirmware::default(),
        }
    }
}

impl Configuration {
    pub fn complete(&self) -> bool { self.problems().count() == 0 }

    /// Pins sampled for override signals, in the order they are evaluated.
    pub fn override_pins(&self) -> impl Iterator<Item = u8> {
        self.factory_reset.pin().into_iter().chain(self.test_firmware.pin())
    }

    pub fn problems(&self) -> impl Iterator<Item = ConfigurationProblem> {
        let strap_pin = self.strap_pin;
        let any_override = self.override_pins().next().is_some();

        #[rustfmt::skip]
        let problems = [
            match (self.factory_reset.pin(), self.test_firmware.pin()) {
                (Some(factory), Some(test)) if factory == test => {
                    Some(ConfigurationProblem::OverridePinsCollide(factory))
                }
                _ => None,
            },
            self.override_pins()
                .find(|pin| *pin == strap_pin)
                .map(ConfigurationProblem::OverrideOnStrapPin),
            (any_override && self.hold_time_ms == 0)
                .then(|| ConfigurationProblem::ZeroHoldTime),
        ];

        problems.into_iter().flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigurationProblem {
    OverridePinsCollide(u8),
    OverrideOnStrapPin(u8),
    ZeroHoldTime,
}

impl Display for ConfigurationProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationProblem::OverridePinsCollide(pin) => write!(
                f,
                "[Overrides] Factory reset and test firmware share GPIO {}",
                pin
            ),
            ConfigurationProblem::OverrideOnStrapPin(pin) => write!(
                f,
                "[Overrides] GPIO {} is driven low at startup and cannot be sampled",
                pin
            ),
            ConfigurationProblem::ZeroHoldTime => {
                f.write_str("[Overrides] Hold time must be greater than zero")
            }
        }
    }
}
