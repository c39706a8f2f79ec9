//! Query result helpers
//!
//! Single-row extraction that tolerates empty results, and "incremental"
//! lookups that try several queries in order until one finds data.

use crate::error::{Error, Result};
use tracing::debug;

/// A query producing at most one row
pub trait SingleResultQuery<T> {
    /// Run the query; `None` when nothing matched
    fn single_result(&mut self) -> Result<Option<T>>;
}

/// A query producing a list of rows
pub trait ListResultQuery<T> {
    /// Run the query; empty when nothing matched
    fn list_result(&mut self) -> Result<Vec<T>>;
}

impl<T, F> SingleResultQuery<T> for F
where
    F: FnMut() -> Result<Option<T>>,
{
    fn single_result(&mut self) -> Result<Option<T>> {
        self()
    }
}

impl<T, F> ListResultQuery<T> for F
where
    F: FnMut() -> Result<Vec<T>>,
{
    fn list_result(&mut self) -> Result<Vec<T>> {
        self()
    }
}

/// Reduce a row set to at most one row
///
/// Unlike a strict single-row fetch, no rows is `Ok(None)`. More than one row
/// fails with `NonUniqueResult`.
pub fn single_result<T>(rows: Vec<T>) -> Result<Option<T>> {
    if rows.len() > 1 {
        return Err(Error::NonUniqueResult { count: rows.len() });
    }
    Ok(rows.into_iter().next())
}

/// Run queries in order until one returns a row
///
/// Returns `None` once every query has been exhausted.
pub fn first_single_result<T>(queries: &mut [&mut dyn SingleResultQuery<T>]) -> Result<Option<T>> {
    for (position, query) in queries.iter_mut().enumerate() {
        if let Some(row) = query.single_result()? {
            return Ok(Some(row));
        }
        debug!(query = position + 1, "Query returned no single result");
    }
    Ok(None)
}

/// Run queries in order until one returns a non-empty list
///
/// Returns the last (empty) list once every query has been exhausted.
pub fn first_non_empty<T>(queries: &mut [&mut dyn ListResultQuery<T>]) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for (position, query) in queries.iter_mut().enumerate() {
        rows = query.list_result()?;
        if !rows.is_empty() {
            break;
        }
        debug!(query = position + 1, "Query returned an empty list");
    }
    Ok(rows)
}
