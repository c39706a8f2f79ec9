//! Pagination module
//!
//! Two-phase paging: find a page's boundaries from the rows a query returns
//! instead of issuing a separate `COUNT(*)`.
//!
//! # Overview
//!
//! A [`PageRequest`] names the target page, page size and lookahead pages. A
//! [`PageResult`] turns it into an offset/limit pair, then resolves the real
//! page from the number of rows fetched. [`run_paging`] drives a
//! [`TwoPhaseFetch`] adapter and falls back to the last page when the target
//! page lies past the end of the data.

mod result;
mod runner;
mod types;

pub use result::PageResult;
pub use runner::{run_first_phase, run_paging};
pub use types::{FetchPhase, PageRequest, PageStatus, TwoPhaseFetch};
