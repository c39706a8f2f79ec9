//! Positional query parameters
//!
//! Parameters bind to `?` placeholders in the order they were added. Optional
//! values are skipped when absent, so a filter that was not given neither binds
//! a value nor takes up a position.

use duckdb::types::Value;

/// Ordered values for `?` placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    values: Vec<Value>,
}

impl QueryParams {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` at the next position and return that position (1-based)
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.values.push(value.into());
        self.values.len()
    }

    /// Bind `value` at the next position if present
    ///
    /// Returns the position used, or `None` when the value was skipped.
    pub fn push_if_some<V: Into<Value>>(&mut self, value: Option<V>) -> Option<usize> {
        value.map(|value| self.push(value))
    }

    /// Position the next bound value will take
    pub fn next_position(&self) -> usize {
        self.values.len() + 1
    }

    /// Number of bound values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound values in position order
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
