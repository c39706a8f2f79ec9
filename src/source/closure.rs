//! Closure-backed source

use crate::error::Result;
use crate::pagination::{PageResult, TwoPhaseFetch};
use std::marker::PhantomData;

/// Two closures acting as the forward and backward fetches
pub struct FnFetch<T, S, E> {
    from_start: S,
    from_end: E,
    _row: PhantomData<fn() -> T>,
}

impl<T, S, E> FnFetch<T, S, E>
where
    S: FnMut(&PageResult) -> Result<Vec<T>>,
    E: FnMut(&PageResult) -> Result<Vec<T>>,
{
    /// Create a source from a forward and a backward fetch
    pub fn new(from_start: S, from_end: E) -> Self {
        Self {
            from_start,
            from_end,
            _row: PhantomData,
        }
    }
}

impl<T, S, E> TwoPhaseFetch for FnFetch<T, S, E>
where
    S: FnMut(&PageResult) -> Result<Vec<T>>,
    E: FnMut(&PageResult) -> Result<Vec<T>>,
{
    type Row = T;

    fn fetch_from_start(&mut self, result: &PageResult) -> Result<Vec<T>> {
        (self.from_start)(result)
    }

    fn fetch_from_end(&mut self, result: &PageResult) -> Result<Vec<T>> {
        (self.from_end)(result)
    }
}

/// Shorthand for [`FnFetch::new`]
pub fn fn_fetch<T, S, E>(from_start: S, from_end: E) -> FnFetch<T, S, E>
where
    S: FnMut(&PageResult) -> Result<Vec<T>>,
    E: FnMut(&PageResult) -> Result<Vec<T>>,
{
    FnFetch::new(from_start, from_end)
}
