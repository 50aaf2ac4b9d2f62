// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Verify that a develop file can be applied.

use clap::Args;
use colored::Colorize;
use miette::Result;

#[cfg(test)]
#[path = "./cmd_check_test.rs"]
mod cmd_check_test;

/// Verify that every overwrite directory exists
#[derive(Debug, Args)]
pub struct CmdCheck {
    #[clap(flatten)]
    config: crate::ConfigFlags,

    /// Also fail on unsupported overwrite schemes
    #[clap(long)]
    strict: bool,
}

impl CmdCheck {
    pub fn run(&mut self) -> Result<i32> {
        let config = self.config.require()?;
        let separator = config
            .namespace_separator
            .unwrap_or(devload::DEFAULT_NAMESPACE_SEPARATOR);
        let mut failures = 0;

        if !config.is_enabled() {
            println!("Warning: develop file is disabled (enabled: false)");
        }

        for (namespace, directory) in config.psr0_overwrites() {
            if devload::normalize_namespace(namespace, separator).is_empty() {
                failures += 1;
                println!("  {} {} (empty namespace)", "✗".red(), namespace);
                continue;
            }
            match crate::checked_directory(directory, &config) {
                Ok(path) => {
                    println!("  {} {} => {}", "✓".green(), namespace.cyan(), path.display());
                }
                Err(err) => {
                    failures += 1;
                    tracing::debug!("{err:?}");
                    println!("  {} {} => {} (not found)", "✗".red(), namespace.cyan(), directory);
                }
            }
        }

        let unsupported = config.unsupported_schemes();
        for scheme in &unsupported {
            println!("Warning: overwrite scheme '{scheme}' is not supported and will be ignored");
        }
        if self.strict {
            failures += unsupported.len();
        }

        if failures > 0 {
            eprintln!("Error: {failures} problem(s) found in develop file");
            return Ok(1);
        }

        println!("✓ Develop file is valid");
        Ok(0)
    }
}
