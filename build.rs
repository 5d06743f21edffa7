use anyhow::Result;
use cairn_config::{codegen::generate_configuration, Configuration};
use std::{env, path::PathBuf};

fn main() -> Result<()> { process_configuration() }

fn process_configuration() -> Result<()> {
    println!("cargo:rerun-if-env-changed=CAIRN_CONFIG");
    println!("cargo:rerun-if-changed=build.rs");

    let configuration: Configuration = match env::var("CAIRN_CONFIG") {
        Ok(config) if !config.trim().is_empty() => ron::from_str(&config)?,
        _ => {
            println!(
                "cargo:warning=No CAIRN_CONFIG supplied, building with the default \
                 configuration (factory reset and test firmware overrides disabled)."
            );
            Configuration::default()
        }
    };

    let problems: Vec<String> = configuration.problems().map(|p| p.to_string()).collect();
    if !problems.is_empty() {
        panic!(
            "\n\nThe boot configuration supplied through `CAIRN_CONFIG` is inconsistent:\n{}\n\n",
            problems.join("\n")
        );
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    generate_configuration(&out_dir, &configuration)?;
    Ok(())
}
