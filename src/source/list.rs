//! In-memory list source

use crate::error::Result;
use crate::pagination::{run_paging, FetchPhase, PageResult, TwoPhaseFetch};

/// Pages over a borrowed slice of rows
///
/// Rows are cloned into each fetch. An offset past the end of the slice yields
/// an empty fetch.
#[derive(Debug, Clone, Copy)]
pub struct ListSource<'a, T> {
    rows: &'a [T],
}

impl<'a, T> ListSource<'a, T> {
    /// Create a source over `rows`
    pub fn new(rows: &'a [T]) -> Self {
        Self { rows }
    }

    /// Number of rows in the source
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the source holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Clone> TwoPhaseFetch for ListSource<'_, T> {
    type Row = T;

    fn fetch_from_start(&mut self, result: &PageResult) -> Result<Vec<T>> {
        let start = to_index(result.first_record_offset()?).min(self.rows.len());
        let end = start
            .saturating_add(to_index(result.last_record_limit()?))
            .min(self.rows.len());
        Ok(self.rows[start..end].to_vec())
    }

    fn fetch_from_end(&mut self, result: &PageResult) -> Result<Vec<T>> {
        let end = to_index(result.last_record_limit()?).min(self.rows.len());
        Ok(self.rows[..end].to_vec())
    }
}

/// Page a slice of rows in one call
pub fn page_list<T: Clone>(
    rows: &[T],
    result: &mut PageResult,
    phase: FetchPhase,
) -> Result<Vec<T>> {
    run_paging(&mut ListSource::new(rows), result, phase)
}

fn to_index(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}
