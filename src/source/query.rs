//! DuckDB query source
//!
//! Wraps a base SELECT statement and pages it with LIMIT/OFFSET. Rows come
//! back as JSON objects keyed by column name. The base statement sits on its
//! own lines inside the subquery, so a trailing `-- comment` stays harmless.

use crate::error::Result;
use crate::pagination::{run_paging, FetchPhase, PageResult, TwoPhaseFetch};
use crate::query::{self, ListResultQuery, QueryParams, SingleResultQuery, Sort};
use crate::types::{JsonObject, JsonValue};
use duckdb::Connection;

/// Pages a SQL query against a DuckDB connection
pub struct QuerySource<'c> {
    conn: &'c Connection,
    sql: String,
    sort: Option<Sort>,
    params: QueryParams,
}

impl<'c> QuerySource<'c> {
    /// Create a source for `sql`
    ///
    /// A trailing `;` is dropped so the statement can be wrapped as a subquery.
    pub fn new(conn: &'c Connection, sql: impl AsRef<str>) -> Self {
        let sql = sql.as_ref().trim().trim_end_matches(';').trim_end();
        Self {
            conn,
            sql: sql.to_string(),
            sort: None,
            params: QueryParams::new(),
        }
    }

    /// Order fetched rows by `sort`
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Bind `params` to the `?` placeholders of the base query
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Bind `value` at the next placeholder position
    #[must_use]
    pub fn with_param(mut self, value: impl Into<duckdb::types::Value>) -> Self {
        self.params.push(value);
        self
    }

    /// Bind `value` at the next placeholder position if present
    #[must_use]
    pub fn with_param_if_some<V: Into<duckdb::types::Value>>(mut self, value: Option<V>) -> Self {
        self.params.push_if_some(value);
        self
    }

    /// Bound parameters
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Base query
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Sorted base query without any window
    pub fn sorted_sql(&self) -> Result<String> {
        let order_by = match &self.sort {
            Some(sort) => sort.order_by_clause()?,
            None => String::new(),
        };

        if order_by.is_empty() {
            Ok(format!("SELECT * FROM (\n{}\n) AS paged", self.sql))
        } else {
            Ok(format!("SELECT * FROM (\n{}\n) AS paged {order_by}", self.sql))
        }
    }

    /// Query for the window `[offset, offset + limit)`
    pub fn paged_sql(&self, offset: i32, limit: i32) -> Result<String> {
        let base = self.sorted_sql()?;
        Ok(format!("{base} LIMIT {limit} OFFSET {offset}"))
    }

    fn fetch_window(&self, offset: i32, limit: i32) -> Result<Vec<JsonValue>> {
        let sql = self.paged_sql(offset, limit)?;
        self.fetch_all(&sql)
    }

    fn fetch_all(&self, sql: &str) -> Result<Vec<JsonValue>> {
        tracing::debug!(params = self.params.len(), "Executing paged query: {}", sql);

        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(duckdb::params_from_iter(self.params.values()))?;

        let mut columns: Option<Vec<String>> = None;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let names = columns.get_or_insert_with(|| row.as_ref().column_names());
            let mut record = JsonObject::new();
            for (idx, name) in names.iter().enumerate() {
                let value: duckdb::types::Value = row.get(idx)?;
                record.insert(name.clone(), duckdb_value_to_json(value));
            }
            records.push(JsonValue::Object(record));
        }

        Ok(records)
    }
}

impl std::fmt::Debug for QuerySource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySource")
            .field("sql", &self.sql)
            .field("sort", &self.sort)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl TwoPhaseFetch for QuerySource<'_> {
    type Row = JsonValue;

    fn fetch_from_start(&mut self, result: &PageResult) -> Result<Vec<JsonValue>> {
        self.fetch_window(result.first_record_offset()?, result.last_record_limit()?)
    }

    fn fetch_from_end(&mut self, result: &PageResult) -> Result<Vec<JsonValue>> {
        self.fetch_window(0, result.last_record_limit()?)
    }
}

impl ListResultQuery<JsonValue> for QuerySource<'_> {
    fn list_result(&mut self) -> Result<Vec<JsonValue>> {
        let sql = self.sorted_sql()?;
        self.fetch_all(&sql)
    }
}

impl SingleResultQuery<JsonValue> for QuerySource<'_> {
    fn single_result(&mut self) -> Result<Option<JsonValue>> {
        // Two rows are enough to detect a non-unique result
        let rows = self.fetch_window(0, 2)?;
        query::single_result(rows)
    }
}

/// Page a SQL query in one call
pub fn page_query(
    conn: &Connection,
    sql: &str,
    sort: Option<Sort>,
    result: &mut PageResult,
    phase: FetchPhase,
) -> Result<Vec<JsonValue>> {
    let mut source = QuerySource::new(conn, sql);
    if let Some(sort) = sort {
        source = source.with_sort(sort);
    }
    run_paging(&mut source, result, phase)
}

/// Convert DuckDB Value to JSON Value
pub(crate) fn duckdb_value_to_json(value: duckdb::types::Value) -> JsonValue {
    use duckdb::types::Value;

    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::Number(i.into()),
        Value::SmallInt(i) => JsonValue::Number(i.into()),
        Value::Int(i) => JsonValue::Number(i.into()),
        Value::BigInt(i) => JsonValue::Number(i.into()),
        Value::HugeInt(i) => JsonValue::String(i.to_string()),
        Value::UTinyInt(i) => JsonValue::Number(i.into()),
        Value::USmallInt(i) => JsonValue::Number(i.into()),
        Value::UInt(i) => JsonValue::Number(i.into()),
        Value::UBigInt(i) => JsonValue::Number(i.into()),
        Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        Value::Double(f) => {
            serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
        }
        Value::Text(s) => JsonValue::String(s),
        Value::Blob(b) => JsonValue::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        Value::Timestamp(unit, t) => {
            let micros = to_micros(unit, t);
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|dt| JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(JsonValue::Number(micros.into()))
        }
        Value::Date32(d) => {
            // 719163 days from 0001-01-01 to 1970-01-01
            d.checked_add(719_163)
                .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
                .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Number(d.into()))
        }
        Value::Time64(unit, t) => {
            let micros = to_micros(unit, t);
            let secs = micros / 1_000_000;
            JsonValue::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros % 1_000_000
            ))
        }
        other => JsonValue::String(format!("{other:?}")),
    }
}

fn to_micros(unit: duckdb::types::TimeUnit, value: i64) -> i64 {
    use duckdb::types::TimeUnit;

    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}
