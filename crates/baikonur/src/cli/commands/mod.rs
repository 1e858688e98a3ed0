//! CLI commands

pub mod publish;

pub use publish::PublishCommand;
