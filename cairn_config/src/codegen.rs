//! Generates the `BUILD_CONFIGURATION` constant included by `cairn_lib::configuration`.
use anyhow::Result;
use proc_macro2::TokenStream;
use quote::quote;
use std::{fs::File, io::Write, path::Path};

use crate::{
    features::{FactoryReset, TestFirmware},
    Configuration,
};

/// Name of the file written to the build script's output directory.
pub const CONFIGURATION_FILE: &str = "boot_configuration.rs";

pub fn generate_configuration<P: AsRef<Path>>(
    out_dir: P,
    configuration: &Configuration,
) -> Result<()> {
    let filename = out_dir.as_ref().join(CONFIGURATION_FILE);
    let mut file = File::create(&filename)?;
    file.write_all(format!("{}", configuration_tokens(configuration)).as_bytes())?;
    Ok(())
}

pub fn configuration_tokens(configuration: &Configuration) -> TokenStream {
    let strap_pin = configuration.strap_pin;
    let hold_time_ms = configuration.hold_time_ms;
    let factory_reset = factory_reset_tokens(&configuration.factory_reset);
    let test_firmware = test_firmware_tokens(&configuration.test_firmware);

    quote! {
        /// Boot configuration selected at build time through `CAIRN_CONFIG`.
        pub const BUILD_CONFIGURATION: BootConfig = BootConfig {
            strap_pin: PinId(#strap_pin),
            hold_time: Milliseconds(#hold_time_ms),
            factory_reset: #factory_reset,
            test_firmware: #test_firmware,
        };
    }
}

fn factory_reset_tokens(factory_reset: &FactoryReset) -> TokenStream {
    match factory_reset {
        FactoryReset::Enabled { pin, erase_ota_state, erase_categories } => {
            let categories = erase_categories.as_str();
            quote! {
                FactoryReset::Enabled {
                    pin: PinId(#pin),
                    erase: EraseRequest {
                        categories: #categories,
                        erase_ota_state: #erase_ota_state,
                    },
                }
            }
        }
        FactoryReset::Disabled => quote! { FactoryReset::Disabled },
    }
}

fn test_firmware_tokens(test_firmware: &TestFirmware) -> TokenStream {
    match test_firmware {
        TestFirmware::Enabled { pin } => quote! { TestFirmware::Enabled { pin: PinId(#pin) } },
        TestFirmware::Disabled => quote! { TestFirmware::Disabled },
    }
}
