//! Two-phase paging runner
//!
//! Runs a fetch adapter against a [`PageResult`] and decides whether a second
//! fetch is needed:
//!
//! 1. Fetch up to `last_record_limit` rows from `first_record_offset`.
//! 2. If nothing came back, the phase is [`FetchPhase::FromEnd`] and a page
//!    exists before the target, rebind the result to the last page and fetch
//!    again from the first row.
//!
//! A last-page request goes straight to the from-end fetch. At most two fetches
//! run per call.

use super::result::PageResult;
use super::types::{FetchPhase, PageRequest, TwoPhaseFetch};
use crate::error::{Error, Result};
use tracing::debug;

/// Run the primary fetch only, never falling back
pub fn run_first_phase<F>(fetch: &mut F, result: &mut PageResult) -> Result<Vec<F::Row>>
where
    F: TwoPhaseFetch + ?Sized,
{
    run_paging(fetch, result, FetchPhase::FromStart)
}

/// Run two-phase paging and return the rows of the resolved page
///
/// Errors returned by the adapter are passed through unchanged.
pub fn run_paging<F>(
    fetch: &mut F,
    result: &mut PageResult,
    phase: FetchPhase,
) -> Result<Vec<F::Row>>
where
    F: TwoPhaseFetch + ?Sized,
{
    let mut request = result
        .request()
        .map_err(|_| Error::invalid_state("Paging result has no request bound"))?;
    let mut retried = false;

    loop {
        if request.is_last_page() {
            let rows = fetch.fetch_from_end(result)?;
            result.record_rows(&rows, FetchPhase::FromEnd)?;
            debug!(
                rows = rows.len(),
                resolved_page = result.resolved_page(),
                "Fetched last page"
            );

            return FetchPhase::FromEnd.to_page(rows, request.page_size());
        }

        let rows = fetch.fetch_from_start(result)?;
        result.record_rows(&rows, FetchPhase::FromStart)?;
        debug!(
            rows = rows.len(),
            target_page = request.target_page(),
            status = %result.status(),
            "Fetched from target page"
        );

        if !retried && should_fall_back(result, &request, phase)? {
            debug!(
                target_page = request.target_page(),
                "Target page is past the data, fetching the last page"
            );
            request.set_target_page(PageRequest::LAST_PAGE)?;
            result.bind(request)?;
            retried = true;
            continue;
        }

        return FetchPhase::FromStart.to_page(rows, request.page_size());
    }
}

fn should_fall_back(
    result: &PageResult,
    request: &PageRequest,
    phase: FetchPhase,
) -> Result<bool> {
    Ok(result.is_empty() && phase == FetchPhase::FromEnd && request.has_previous_page()?)
}
