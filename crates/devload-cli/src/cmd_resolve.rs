// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `devload resolve` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

#[cfg(test)]
#[path = "./cmd_resolve_test.rs"]
mod cmd_resolve_test;

/// Print the file each class resolves to
#[derive(Debug, Args)]
pub struct CmdResolve {
    /// Fully qualified class names to resolve
    #[clap(required = true)]
    classes: Vec<String>,

    #[clap(flatten)]
    config: crate::ConfigFlags,

    /// Additional namespace mapping (PREFIX=DIR), applied after the develop file
    #[clap(short = 'm', long = "map", value_parser = crate::parse_mapping)]
    mappings: Vec<(String, String)>,

    /// Namespace separator, overriding the develop file
    #[clap(long)]
    separator: Option<char>,

    /// Source file extension, overriding the develop file
    #[clap(long)]
    extension: Option<String>,
}

impl CmdResolve {
    pub fn run(&mut self) -> Result<i32> {
        let config = self.config.load()?;
        let resolver = self.build_resolver(config.as_ref())?;

        let mut unresolved = 0;
        for class in &self.classes {
            match resolver.resolve(class) {
                Some(path) if path.is_file() => {
                    println!("{} => {}", class.cyan(), path.display().to_string().green());
                }
                Some(path) => {
                    println!(
                        "{} => {} {}",
                        class.cyan(),
                        path.display(),
                        "(missing)".yellow()
                    );
                }
                None => {
                    unresolved += 1;
                    println!("{} => {}", class.cyan(), "(no matching namespace)".dimmed());
                }
            }
        }

        Ok(if unresolved > 0 { 1 } else { 0 })
    }

    fn build_resolver(
        &self,
        config: Option<&devload::DevelopConfig>,
    ) -> Result<devload::NamespaceResolver> {
        let separator = self
            .separator
            .or_else(|| config.and_then(|c| c.namespace_separator))
            .unwrap_or(devload::DEFAULT_NAMESPACE_SEPARATOR);
        let extension = self
            .extension
            .clone()
            .or_else(|| config.and_then(|c| c.source_extension.clone()))
            .unwrap_or_else(|| devload::DEFAULT_SOURCE_EXTENSION.to_string());

        let mut resolver = devload::NamespaceResolver::default()
            .with_separator(separator)
            .with_extension(extension);

        if let Some(config) = config {
            for (namespace, directory) in config.psr0_overwrites() {
                let directory = crate::checked_directory(directory, config)?;
                resolver.add_namespace(namespace, directory)?;
            }
        }
        for (namespace, directory) in &self.mappings {
            resolver.add_namespace(namespace, directory)?;
        }

        if resolver.mappings().next().is_none() {
            tracing::warn!("no namespace mappings configured, nothing can resolve");
        }
        Ok(resolver)
    }
}
