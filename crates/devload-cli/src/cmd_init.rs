// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `devload init` command.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result, WrapErr};

#[cfg(test)]
#[path = "./cmd_init_test.rs"]
mod cmd_init_test;

/// Create a new config/develop.yaml file
#[derive(Debug, Args)]
pub struct CmdInit {
    /// Application root to create the file in
    #[clap(default_value = ".")]
    path: PathBuf,

    /// Add an initial namespace overwrite (PREFIX=DIR)
    #[clap(short = 'm', long = "map", value_parser = crate::parse_mapping)]
    mappings: Vec<(String, String)>,

    /// Add an initial development provider
    #[clap(long = "provider")]
    providers: Vec<String>,
}

impl CmdInit {
    pub fn run(&mut self) -> Result<i32> {
        let config_path = self.path.join(devload::DEVELOP_CONFIG_PATH);

        // Check if file already exists
        if config_path.exists() {
            return Err(miette::miette!(
                "develop file already exists at {:?}",
                config_path
            ));
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to create {parent:?}"))?;
        }

        std::fs::write(&config_path, self.render_template())
            .into_diagnostic()
            .wrap_err("Failed to write develop file")?;

        println!("Created develop file at {:?}", config_path);
        println!();
        println!("Next steps:");
        println!("  1. Point package-overwrites at your local checkouts");
        println!("  2. Run 'devload check' to verify the directories");
        println!("  3. Keep this file out of version control");

        Ok(0)
    }

    pub(crate) fn render_template(&self) -> String {
        let mut out = String::from(
            "api: devload/v0\n\
            \n\
            # Only applied in local environments. Set to false to switch off.\n\
            enabled: true\n\
            \n\
            package-overwrites:\n  psr-0:\n",
        );

        if self.mappings.is_empty() {
            out.push_str("    # Vendor\\Package: ../packages/package/src\n");
        }
        for (namespace, directory) in &self.mappings {
            out.push_str(&format!("    {}: {}\n", yaml_string(namespace), yaml_string(directory)));
        }

        out.push_str("\nproviders:");
        if self.providers.is_empty() {
            out.push_str(" []\n");
        } else {
            out.push('\n');
            for provider in &self.providers {
                out.push_str(&format!("  - {}\n", yaml_string(provider)));
            }
        }
        out
    }
}

/// Quote a value for use as a YAML scalar.
fn yaml_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
