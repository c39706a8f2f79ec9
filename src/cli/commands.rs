//! CLI commands and argument parsing

use crate::pagination::PageRequest;
use crate::query::Sort;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Two-phase pagination over JSON files and DuckDB queries
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paging config file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the offset and limit a request would fetch
    Plan {
        /// Target page number, or "last"
        #[arg(short, long, default_value = "1", value_parser = parse_target_page)]
        page: i32,

        /// Rows per page
        #[arg(short, long)]
        size: Option<i32>,

        /// Pages to probe after the target page
        #[arg(short, long)]
        lookahead: Option<i32>,
    },

    /// Fetch one page of rows
    Page {
        /// JSON file holding an array of rows
        #[arg(long, conflicts_with_all = ["database", "query"])]
        json: Option<PathBuf>,

        /// DuckDB database file (":memory:" for an in-memory database)
        #[arg(long)]
        database: Option<String>,

        /// Base SELECT statement
        #[arg(short, long)]
        query: Option<String>,

        /// Target page number, or "last"
        #[arg(short, long, default_value = "1", value_parser = parse_target_page)]
        page: i32,

        /// Rows per page
        #[arg(short, long)]
        size: Option<i32>,

        /// Pages to probe after the target page
        #[arg(short, long)]
        lookahead: Option<i32>,

        /// Fall back to the last page when the target page is past the data
        #[arg(long)]
        two_phase: bool,

        /// Sort key, optionally suffixed with ":asc" or ":desc"
        #[arg(long, value_parser = parse_sort)]
        sort: Option<Sort>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a page number or "last"
fn parse_target_page(value: &str) -> std::result::Result<i32, String> {
    if value.trim().eq_ignore_ascii_case("last") {
        return Ok(PageRequest::LAST_PAGE);
    }

    let page: i32 = value
        .trim()
        .parse()
        .map_err(|_| format!("expected a page number or \"last\", got '{value}'"))?;
    if page < 1 {
        return Err(format!("page must be >= 1, got {page}"));
    }
    Ok(page)
}

fn parse_sort(value: &str) -> std::result::Result<Sort, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}
