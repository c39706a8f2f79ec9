//! Paging request, status and fetch phase types
//!
//! Defines the value types shared by the result holder, the runner and the
//! fetch adapters.

use super::result::PageResult;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Page Request
// ============================================================================

/// The paging parameters supplied by a caller
///
/// Holds the target page (1-based, or [`PageRequest::LAST_PAGE`]), the page
/// size and the number of pages after the target the caller wants confirmed.
/// A default request has every field at [`PageRequest::UNINITIALIZED`] and
/// fails [`PageRequest::validate`] until the fields are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    target_page: i32,
    page_size: i32,
    lookahead_pages: i32,
}

impl PageRequest {
    /// Target page value requesting the last page of the data
    pub const LAST_PAGE: i32 = -1;

    /// Value of every field of a default request
    ///
    /// Equal to [`PageRequest::LAST_PAGE`], so an unset target page alone is
    /// indistinguishable from a last-page request.
    pub const UNINITIALIZED: i32 = -1;

    /// Create a request, validating every field
    pub fn new(target_page: i32, page_size: i32, lookahead_pages: i32) -> Result<Self> {
        Ok(Self {
            target_page: check_target_page(target_page)?,
            page_size: check_page_size(page_size)?,
            lookahead_pages: check_lookahead_pages(lookahead_pages)?,
        })
    }

    /// Create a request for the first page with no lookahead
    pub fn with_page_size(page_size: i32) -> Result<Self> {
        Self::new(1, page_size, 0)
    }

    /// Create a request for the last page
    pub fn last_page(page_size: i32, lookahead_pages: i32) -> Result<Self> {
        Self::new(Self::LAST_PAGE, page_size, lookahead_pages)
    }

    /// Set the target page, `>= 1` or [`PageRequest::LAST_PAGE`]
    pub fn set_target_page(&mut self, target_page: i32) -> Result<()> {
        self.target_page = check_target_page(target_page)?;
        Ok(())
    }

    /// Set the page size, `>= 1`
    pub fn set_page_size(&mut self, page_size: i32) -> Result<()> {
        self.page_size = check_page_size(page_size)?;
        Ok(())
    }

    /// Set the number of pages to look ahead, `>= 0`
    pub fn set_lookahead_pages(&mut self, lookahead_pages: i32) -> Result<()> {
        self.lookahead_pages = check_lookahead_pages(lookahead_pages)?;
        Ok(())
    }

    /// Target page, may be [`PageRequest::LAST_PAGE`]
    pub fn target_page(&self) -> i32 {
        self.target_page
    }

    /// Number of rows per page
    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Number of pages after the target to look ahead
    pub fn lookahead_pages(&self) -> i32 {
        self.lookahead_pages
    }

    /// Whether this request asks for the last page
    pub fn is_last_page(&self) -> bool {
        self.target_page == Self::LAST_PAGE
    }

    /// Re-check every field against the setter constraints
    pub fn validate(&self) -> Result<()> {
        check_target_page(self.target_page)?;
        check_page_size(self.page_size)?;
        check_lookahead_pages(self.lookahead_pages)?;
        Ok(())
    }

    /// Whether a page exists before the target page
    ///
    /// Decides if a from-end fallback fetch is worth running.
    pub fn has_previous_page(&self) -> Result<bool> {
        self.validate()
            .map_err(|e| Error::invalid_state(format!("Paging request is not initialized: {e}")))?;
        Ok(self.target_page > 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            target_page: Self::UNINITIALIZED,
            page_size: Self::UNINITIALIZED,
            lookahead_pages: Self::UNINITIALIZED,
        }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Target Page: {}, Page Size: {}, Lookahead Pages: {}",
            self.target_page, self.page_size, self.lookahead_pages
        )
    }
}

fn check_target_page(target_page: i32) -> Result<i32> {
    if target_page > 0 || target_page == PageRequest::LAST_PAGE {
        Ok(target_page)
    } else {
        Err(Error::invalid_argument(format!(
            "Target page number must be >= 1, current: {target_page}"
        )))
    }
}

fn check_page_size(page_size: i32) -> Result<i32> {
    if page_size > 0 {
        Ok(page_size)
    } else {
        Err(Error::invalid_argument(format!(
            "Page size must be >= 1, current: {page_size}"
        )))
    }
}

fn check_lookahead_pages(lookahead_pages: i32) -> Result<i32> {
    if lookahead_pages >= 0 {
        Ok(lookahead_pages)
    } else {
        Err(Error::invalid_argument(format!(
            "Lookahead pages must be >= 0, current: {lookahead_pages}"
        )))
    }
}

// ============================================================================
// Page Status
// ============================================================================

/// Outcome of recording a fetch's row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// No row count has been recorded yet
    #[default]
    NotReady,
    /// The fetch returned no rows
    EmptyData,
    /// No page exists beyond the lookahead window
    ReachedLastPage,
    /// At least one page exists beyond the lookahead window
    HasMorePage,
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotReady => "not_ready",
            Self::EmptyData => "empty_data",
            Self::ReachedLastPage => "reached_last_page",
            Self::HasMorePage => "has_more_page",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Fetch Phase
// ============================================================================

/// Which end of the result set a fetch is anchored to
///
/// ```text
/// 0 ========== offset ========== offset + limit
/// ^ FromEnd    ^ FromStart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// The primary fetch, starting at the target page's first row
    #[default]
    FromStart,
    /// The fallback fetch, ending at the last row of the data
    FromEnd,
}

impl FetchPhase {
    /// Borrow the rows belonging to one page
    ///
    /// `FromStart` keeps the leading `page_size` rows, `FromEnd` the trailing ones.
    pub fn slice<T>(self, rows: &[T], page_size: i32) -> Result<&[T]> {
        let size = checked_slice_size(page_size)?;
        let range = match self {
            Self::FromStart => 0..rows.len().min(size),
            Self::FromEnd => rows.len().saturating_sub(size)..rows.len(),
        };
        Ok(&rows[range])
    }

    /// Owning counterpart of [`FetchPhase::slice`]
    pub fn to_page<T>(self, mut rows: Vec<T>, page_size: i32) -> Result<Vec<T>> {
        let size = checked_slice_size(page_size)?;
        match self {
            Self::FromStart => rows.truncate(size),
            Self::FromEnd => {
                let start = rows.len().saturating_sub(size);
                rows.drain(..start);
            }
        }
        Ok(rows)
    }
}

fn checked_slice_size(page_size: i32) -> Result<usize> {
    if page_size <= 0 {
        return Err(Error::invalid_argument(format!(
            "Page size must be >= 1, current: {page_size}"
        )));
    }
    Ok(usize::try_from(page_size).unwrap_or(usize::MAX))
}

// ============================================================================
// Fetch Adapter
// ============================================================================

/// Row source driven by the two-phase runner
///
/// Implementations read the offset and limit from the [`PageResult`] and must
/// return an empty vector, never an error, when no rows exist there.
pub trait TwoPhaseFetch {
    /// Row type returned by the source
    type Row;

    /// Fetch at most `last_record_limit` rows starting at `first_record_offset`
    fn fetch_from_start(&mut self, result: &PageResult) -> Result<Vec<Self::Row>>;

    /// Fetch rows from the first row, bounded by `last_record_limit`
    fn fetch_from_end(&mut self, result: &PageResult) -> Result<Vec<Self::Row>>;
}
