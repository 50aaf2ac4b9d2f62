// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! devload - Development Namespace Override CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_check;
mod cmd_init;
mod cmd_resolve;
mod cmd_show;


use cmd_check::CmdCheck;
use cmd_init::CmdInit;
use cmd_resolve::CmdResolve;
use cmd_show::CmdShow;

#[derive(Parser)]
#[clap(
    name = "devload",
    about = "Development Namespace Overrides",
    version,
    long_about = "Inspect and check develop files that redirect package namespaces to local directories"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Flags locating the develop file.
#[derive(Parser, Clone, Debug, Default)]
pub struct ConfigFlags {
    /// Develop file to use instead of <ROOT>/config/develop.yaml
    #[clap(short = 'f', long = "file", env = "DEVLOAD_CONFIG")]
    pub file: Option<PathBuf>,

    /// Application root to look for config/develop.yaml in
    #[clap(long, default_value = ".")]
    pub root: PathBuf,
}

impl ConfigFlags {
    /// Path of the develop file these flags point at.
    pub fn path(&self) -> Option<PathBuf> {
        match &self.file {
            Some(file) => Some(file.clone()),
            None => devload::find_config(&self.root),
        }
    }

    /// Load the develop file, if there is one.
    pub fn load(&self) -> Result<Option<devload::DevelopConfig>> {
        let Some(path) = self.path() else {
            return Ok(None);
        };
        let config = devload::DevelopConfig::load(&path)?;
        Ok(config)
    }

    /// Load the develop file, failing when there is none.
    pub fn require(&self) -> Result<devload::DevelopConfig> {
        self.load()?.ok_or_else(|| {
            miette::miette!(
                help = "Create one with 'devload init' or point at it with -f",
                "No develop file found under {:?}",
                self.root
            )
        })
    }
}

/// Parse a `PREFIX=DIR` namespace mapping.
pub fn parse_mapping(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((prefix, dir)) if !prefix.is_empty() && !dir.is_empty() => {
            Ok((prefix.to_string(), dir.to_string()))
        }
        _ => Err(format!("expected PREFIX=DIR, got '{value}'")),
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create a new config/develop.yaml file
    Init(CmdInit),

    /// Display the develop file
    Show(CmdShow),

    /// Print the file each class resolves to
    Resolve(CmdResolve),

    /// Verify that every overwrite directory exists
    Check(CmdCheck),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Init(mut cmd) => cmd.run(),
            Command::Show(mut cmd) => cmd.run(),
            Command::Resolve(mut cmd) => cmd.run(),
            Command::Check(mut cmd) => cmd.run(),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}

/// Read an overwrite directory from a develop file into a checked path.
pub fn checked_directory(directory: &str, config: &devload::DevelopConfig) -> Result<PathBuf> {
    let expanded = devload::expand_directory(directory, config.base_dir())?;
    Ok(devload::normalize_directory(&expanded)?)
}
