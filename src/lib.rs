// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewise
//!
//! Two-phase pagination: fetch a target page plus a lookahead window in one
//! query, and fall back to the last page when the target lies past the data.
//!
//! ## Features
//!
//! - **Window arithmetic**: offset and limit for a page request, saturated at `i32::MAX`
//! - **Result resolution**: resolved page, confirmed extra pages and status from a row count
//! - **Two-phase runner**: one retry against the last page when the target is empty
//! - **Fetch adapters**: in-memory slices, DuckDB queries, closures
//! - **Query helpers**: single-result extraction and incremental fallback queries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::pagination::{FetchPhase, PageRequest, PageResult};
//! use pagewise::source::page_list;
//!
//! let rows: Vec<i32> = (1..=100).collect();
//! let mut result = PageResult::new(PageRequest::new(11, 10, 3)?)?;
//!
//! // Page 11 is past the data, so the last page comes back instead
//! let page = page_list(&rows, &mut result, FetchPhase::FromEnd)?;
//! assert_eq!(result.resolved_page(), 10);
//! assert_eq!(page, (91..=100).collect::<Vec<_>>());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ PageRequest ──► PageResult ──► offset / limit             │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//!                  run_paging (FromStart, FromEnd)
//!                              │
//! ┌───────────────┬────────────┴────┬────────────────────────┐
//! │  ListSource   │  QuerySource    │  FnFetch               │
//! │  (slice)      │  (DuckDB SQL)   │  (closures)            │
//! └───────────────┴─────────────────┴────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for pagewise
pub mod error;

/// Common types and type aliases
pub mod types;

/// Saturating i32 arithmetic
pub mod math;

/// Page requests, results and the two-phase runner
pub mod pagination;

/// Fetch adapters
pub mod source;

/// Query result helpers and sort order
pub mod query;

/// Paging configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, PagingConfig};
pub use pagination::{run_paging, FetchPhase, PageRequest, PageResult, PageStatus, TwoPhaseFetch};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
