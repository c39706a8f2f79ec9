//! Paging result holder
//!
//! A [`PageResult`] carries two sets of values. Before a fetch it supplies the
//! offset and limit a data source should use. After a fetch it records the row
//! count and resolves the actual page, the pages available after it and the
//! [`PageStatus`].

use super::types::{FetchPhase, PageRequest, PageStatus};
use crate::error::{Error, Result};
use crate::math;
use serde::Serialize;

/// Outcome of a two-phase paging run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    request: Option<PageRequest>,
    resolved_page: i32,
    extra_pages_available: i32,
    status: PageStatus,
}

impl PageResult {
    /// Value of the resolved fields before a row count is recorded
    pub const UNKNOWN: i32 = -1;

    /// Create a result bound to a copy of `request`
    ///
    /// Fails with `InvalidArgument` if the request does not validate.
    pub fn new(request: PageRequest) -> Result<Self> {
        let mut result = Self::unbound();
        result.bind(request)?;
        Ok(result)
    }

    /// Create a result with no request bound
    pub fn unbound() -> Self {
        Self {
            request: None,
            resolved_page: Self::UNKNOWN,
            extra_pages_available: Self::UNKNOWN,
            status: PageStatus::NotReady,
        }
    }

    /// Bind a copy of `request`, discarding any recorded outcome
    pub fn bind(&mut self, request: PageRequest) -> Result<()> {
        request.validate()?;

        self.request = Some(request);
        self.resolved_page = Self::UNKNOWN;
        self.extra_pages_available = Self::UNKNOWN;
        self.status = PageStatus::NotReady;
        Ok(())
    }

    /// Whether a request is bound
    pub fn is_bound(&self) -> bool {
        self.request.is_some()
    }

    /// Copy of the bound request
    pub fn request(&self) -> Result<PageRequest> {
        self.bound_request()
    }

    /// Zero-based offset of the first row to fetch
    ///
    /// `(target_page - 1) * page_size`, saturated at `i32::MAX`; `0` for a
    /// last-page request.
    pub fn first_record_offset(&self) -> Result<i32> {
        let request = self.bound_request()?;
        if request.is_last_page() {
            return Ok(0);
        }

        Ok(math::multiply(
            math::subtract(request.target_page(), 1),
            request.page_size(),
        ))
    }

    /// Maximum number of rows to fetch
    ///
    /// `(lookahead_pages + 1) * page_size + 1`, saturated at `i32::MAX`;
    /// `i32::MAX` for a last-page request. The extra row only signals that
    /// more pages exist.
    pub fn last_record_limit(&self) -> Result<i32> {
        let request = self.bound_request()?;
        Ok(Self::record_limit(&request))
    }

    /// Record the number of rows a fetch returned
    ///
    /// A last-page request is always resolved with the from-end rule.
    pub fn record_row_count(&mut self, row_count: i32, phase: FetchPhase) -> Result<()> {
        if row_count < 0 {
            return Err(Error::invalid_argument(format!(
                "Row count must be >= 0, current: {row_count}"
            )));
        }
        let request = self.bound_request()?;

        if request.is_last_page() {
            self.resolve_from_end(&request, row_count);
            return Ok(());
        }

        match phase {
            FetchPhase::FromStart => self.resolve_from_start(&request, row_count),
            FetchPhase::FromEnd => self.resolve_from_end(&request, row_count),
        }
        Ok(())
    }

    /// Record the length of a fetched row set
    pub fn record_rows<T>(&mut self, rows: &[T], phase: FetchPhase) -> Result<()> {
        self.record_row_count(math::len_to_i32(rows.len()), phase)
    }

    /// Page the data actually supports, `0` when there is no data
    pub fn resolved_page(&self) -> i32 {
        self.resolved_page
    }

    /// Number of pages confirmed after the resolved page
    pub fn extra_pages_available(&self) -> i32 {
        self.extra_pages_available
    }

    /// Current status
    pub fn status(&self) -> PageStatus {
        self.status
    }

    /// Whether pages exist beyond the lookahead window
    pub fn has_more_pages(&self) -> bool {
        self.status == PageStatus::HasMorePage
    }

    /// Whether the last recorded fetch found no rows
    pub fn is_empty(&self) -> bool {
        self.status == PageStatus::EmptyData
    }

    fn bound_request(&self) -> Result<PageRequest> {
        self.request
            .ok_or_else(|| Error::invalid_state("Paging request is not bound"))
    }

    fn record_limit(request: &PageRequest) -> i32 {
        if request.is_last_page() {
            return i32::MAX;
        }

        math::add(
            math::multiply(math::add(request.lookahead_pages(), 1), request.page_size()),
            1,
        )
    }

    // 0 ---------- offset ---------- offset + limit
    //              ^ rows counted from here
    fn resolve_from_start(&mut self, request: &PageRequest, row_count: i32) {
        if row_count == 0 {
            self.set_empty();
            return;
        }

        let page_size = request.page_size();
        if row_count <= page_size {
            self.set_resolved(PageStatus::ReachedLastPage, request.target_page(), 0);
            return;
        }

        if row_count < Self::record_limit(request) {
            self.set_resolved(
                PageStatus::ReachedLastPage,
                request.target_page(),
                math::ceil_div(row_count, page_size) - 1,
            );
            return;
        }

        self.set_resolved(
            PageStatus::HasMorePage,
            request.target_page(),
            request.lookahead_pages(),
        );
    }

    // 0 ---------- offset ---------- offset + limit
    // ^ rows counted from here
    fn resolve_from_end(&mut self, request: &PageRequest, row_count: i32) {
        if row_count == 0 {
            self.set_empty();
            return;
        }

        self.set_resolved(
            PageStatus::ReachedLastPage,
            math::ceil_div(row_count, request.page_size()),
            0,
        );
    }

    fn set_empty(&mut self) {
        self.set_resolved(PageStatus::EmptyData, 0, 0);
    }

    fn set_resolved(&mut self, status: PageStatus, page: i32, extra_pages: i32) {
        debug_assert!(page >= 0 && extra_pages >= 0);
        self.status = status;
        self.resolved_page = page;
        self.extra_pages_available = extra_pages;
    }
}

impl Default for PageResult {
    fn default() -> Self {
        Self::unbound()
    }
}
