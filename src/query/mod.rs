//! Query helpers
//!
//! Supports: single-result extraction, incremental fallback queries, sort order,
//! optional positional parameters
//!
//! # Overview
//!
//! These helpers sit around the fetch adapters: [`Sort`] renders the ORDER BY
//! of a paged query, and the result helpers reduce or chain query results
//! without treating "no rows" as an error.

mod params;
mod results;
mod sort;

pub use params::QueryParams;
pub use results::{
    first_non_empty, first_single_result, single_result, ListResultQuery, SingleResultQuery,
};
pub use sort::{Sort, SortDirection};
