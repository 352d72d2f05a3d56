//! Millwright CLI - batch driver for the extraction pipeline.
//!
//! Wires the concrete providers and collaborators into the pipeline core:
//! a credentialed cloud chat model as the primary, a local model as the
//! fallback, HTTP source fetching, and plain-text conversion. One
//! invocation drives one batch and exits; interrupted batches resume from
//! their checkpoint artifacts on the next invocation.

#![warn(missing_docs)]

pub mod cli;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use config::{FileConfig, RunConfig};
pub use error::{CliError, Result};
