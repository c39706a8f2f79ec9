//! CLI module
//!
//! Command-line interface for paging JSON files and DuckDB queries.
//!
//! # Commands
//!
//! - `plan` - Show the offset and limit a request would fetch
//! - `page` - Fetch one page of rows with optional last-page fallback

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{PageOutput, PageSource, Runner};
