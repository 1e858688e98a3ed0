//! CLI definition and command handling

pub mod ci_output;
pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::PublishCommand;

/// Baikonur - AppGallery publishing CLI for CI pipelines
#[derive(Debug, Parser)]
#[command(name = "baikonur")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish a build artifact to AppGallery Connect
    Publish(PublishCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Publish(ref cmd) => cmd.execute(&self),
        }
    }
}
