// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `devload show` command.

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

#[cfg(test)]
#[path = "./cmd_show_test.rs"]
mod cmd_show_test;

/// Display the develop file
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    config: crate::ConfigFlags,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let config = self.config.require()?;

        match self.format.as_str() {
            "yaml" => print!("{}", serde_yaml::to_string(&config).into_diagnostic()?),
            "json" => println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?),
            _ => self.show_table(&config),
        }

        Ok(0)
    }

    fn show_table(&self, config: &devload::DevelopConfig) {
        let path = config
            .source_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        let status = if config.is_enabled() {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!("{} [{}]", path.cyan(), status);
        println!();

        println!("{}", "Namespace Overwrites (psr-0):".bold());
        println!();
        let overwrites: Vec<_> = config.psr0_overwrites().collect();
        if overwrites.is_empty() {
            println!("  {}", "(no overwrites)".dimmed());
        }
        for (i, (namespace, directory)) in overwrites.iter().enumerate() {
            println!("  {}. {} => {}", i + 1, namespace.cyan(), directory.green());
        }
        for scheme in config.unsupported_schemes() {
            println!("  {}", format!("[{scheme}: unsupported, ignored]").yellow());
        }

        println!();
        println!("{}", "Development Providers:".bold());
        println!();
        if config.providers.is_empty() {
            println!("  {}", "(no providers)".dimmed());
        }
        for (i, provider) in config.providers.iter().enumerate() {
            println!("  {}. {}", i + 1, provider.green());
        }

        println!();
        println!(
            "Total: {} overwrite(s), {} provider(s)",
            overwrites.len(),
            config.providers.len()
        );
    }
}
