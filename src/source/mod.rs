//! Fetch adapters
//!
//! Supports: in-memory slices, DuckDB queries, closures
//!
//! Each adapter implements [`TwoPhaseFetch`](crate::pagination::TwoPhaseFetch)
//! and honors the window the bound [`PageResult`](crate::pagination::PageResult)
//! describes.

mod closure;
mod list;
mod query;

pub use closure::{fn_fetch, FnFetch};
pub use list::{page_list, ListSource};
pub use query::{page_query, QuerySource};

#[cfg(test)]
mod tests;
