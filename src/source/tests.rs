//! Tests for source module

use super::*;
use crate::error::Error;
use crate::pagination::{
    run_paging, FetchPhase, PageRequest, PageResult, PageStatus, TwoPhaseFetch,
};
use crate::query::{first_non_empty, ListResultQuery, SingleResultQuery, Sort};
use crate::types::JsonValue;
use duckdb::Connection;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn numbers(count: i32) -> Vec<i32> {
    (1..=count).collect()
}

fn result_for(target_page: i32, page_size: i32, lookahead_pages: i32) -> PageResult {
    PageResult::new(PageRequest::new(target_page, page_size, lookahead_pages).unwrap()).unwrap()
}

fn numbers_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE numbers AS SELECT CAST(range AS INTEGER) AS n FROM range(1, 101);",
    )
    .unwrap();
    conn
}

fn column(rows: &[JsonValue], name: &str) -> Vec<i64> {
    rows.iter()
        .map(|row| row[name].as_i64().unwrap())
        .collect()
}

// ============================================================================
// ListSource Tests
// ============================================================================

#[test]
fn test_list_source_window() {
    let data = numbers(100);
    let mut source = ListSource::new(&data);
    let result = result_for(5, 10, 3);

    let rows = source.fetch_from_start(&result).unwrap();

    assert_eq!(rows.len(), 41);
    assert_eq!(rows.first(), Some(&41));
    assert_eq!(rows.last(), Some(&81));
}

#[test]
fn test_list_source_offset_past_end_is_empty() {
    let data = numbers(10);
    let mut source = ListSource::new(&data);
    let result = result_for(3, 10, 0);

    let rows = source.fetch_from_start(&result).unwrap();

    assert!(rows.is_empty());
    assert_eq!(source.len(), 10);
    assert!(!source.is_empty());
}

#[test_case(5, 10, 3, 41..=50, 5, 3, PageStatus::HasMorePage ; "middle page")]
#[test_case(11, 10, 3, 91..=100, 10, 0, PageStatus::ReachedLastPage ; "past the data falls back")]
#[test_case(PageRequest::LAST_PAGE, 20, 3, 81..=100, 5, 0, PageStatus::ReachedLastPage ; "last page")]
#[test_case(i32::MAX, i32::MAX, 3, 1..=100, 1, 0, PageStatus::ReachedLastPage ; "extreme values")]
fn test_page_list_from_end(
    target_page: i32,
    page_size: i32,
    lookahead_pages: i32,
    expected: std::ops::RangeInclusive<i32>,
    expected_page: i32,
    expected_extra: i32,
    expected_status: PageStatus,
) {
    let data = numbers(100);
    let mut result = result_for(target_page, page_size, lookahead_pages);

    let rows = page_list(&data, &mut result, FetchPhase::FromEnd).unwrap();

    assert_eq!(rows, expected.collect::<Vec<_>>());
    assert_eq!(result.resolved_page(), expected_page);
    assert_eq!(result.extra_pages_available(), expected_extra);
    assert_eq!(result.status(), expected_status);
}

#[test]
fn test_page_list_empty_data() {
    let data: Vec<i32> = Vec::new();
    let mut result = result_for(i32::MAX, i32::MAX, 3);

    let rows = page_list(&data, &mut result, FetchPhase::FromEnd).unwrap();

    assert!(rows.is_empty());
    assert_eq!(result.resolved_page(), 0);
    assert_eq!(result.extra_pages_available(), 0);
    assert_eq!(result.status(), PageStatus::EmptyData);
}

#[test]
fn test_page_list_from_start_does_not_fall_back() {
    let data = numbers(100);
    let mut result = result_for(11, 10, 3);

    let rows = page_list(&data, &mut result, FetchPhase::FromStart).unwrap();

    assert!(rows.is_empty());
    assert_eq!(result.status(), PageStatus::EmptyData);
    assert_eq!(result.request().unwrap().target_page(), 11);
}

// ============================================================================
// FnFetch Tests
// ============================================================================

#[test]
fn test_fn_fetch_routes_phases() {
    let data = numbers(30);
    let mut starts = Vec::new();
    let mut ends = Vec::new();

    let mut result = result_for(7, 5, 1);
    let rows = {
        let mut fetch = fn_fetch(
            |result: &PageResult| {
                starts.push(result.first_record_offset()?);
                Ok(Vec::new())
            },
            |result: &PageResult| {
                ends.push(result.last_record_limit()?);
                Ok(data.clone())
            },
        );
        run_paging(&mut fetch, &mut result, FetchPhase::FromEnd).unwrap()
    };

    assert_eq!(starts, vec![30]);
    assert_eq!(ends, vec![i32::MAX]);
    assert_eq!(rows, (26..=30).collect::<Vec<_>>());
    assert_eq!(result.resolved_page(), 6);
}

#[test]
fn test_fn_fetch_error_passes_through() {
    let mut fetch = FnFetch::new(
        |_: &PageResult| -> crate::Result<Vec<i32>> {
            Err(Error::Other("disk gone".to_string()))
        },
        |_: &PageResult| Ok(Vec::new()),
    );
    let mut result = result_for(1, 10, 0);

    let err = run_paging(&mut fetch, &mut result, FetchPhase::FromEnd).unwrap_err();

    assert_eq!(err.to_string(), "disk gone");
    assert_eq!(result.status(), PageStatus::NotReady);
}

// ============================================================================
// QuerySource Tests
// ============================================================================

#[test]
fn test_query_source_paged_sql() {
    let conn = Connection::open_in_memory().unwrap();
    let source = QuerySource::new(&conn, "SELECT * FROM numbers;  ").with_sort(Sort::desc("n"));

    assert_eq!(source.sql(), "SELECT * FROM numbers");
    assert_eq!(
        source.paged_sql(40, 41).unwrap(),
        "SELECT * FROM (\nSELECT * FROM numbers\n) AS paged ORDER BY n DESC LIMIT 41 OFFSET 40"
    );
}

#[test]
fn test_query_source_unsorted_sql() {
    let conn = Connection::open_in_memory().unwrap();
    let source = QuerySource::new(&conn, "SELECT 1");

    assert_eq!(
        source.paged_sql(0, 11).unwrap(),
        "SELECT * FROM (\nSELECT 1\n) AS paged LIMIT 11 OFFSET 0"
    );
}

#[test]
fn test_query_source_rejects_bad_sort_key() {
    let conn = numbers_db();
    let mut result = result_for(1, 10, 0);

    let err = page_query(
        &conn,
        "SELECT * FROM numbers",
        Some(Sort::asc("n; DROP TABLE numbers")),
        &mut result,
        FetchPhase::FromStart,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidSortKey { .. }));
    let mut all = QuerySource::new(&conn, "SELECT * FROM numbers");
    assert_eq!(all.list_result().unwrap().len(), 100);
}

#[test]
fn test_page_query_trailing_line_comment() {
    let conn = numbers_db();
    let mut result = result_for(2, 10, 0);

    let rows = page_query(
        &conn,
        "SELECT * FROM numbers -- every row",
        Some(Sort::asc("n")),
        &mut result,
        FetchPhase::FromEnd,
    )
    .unwrap();

    assert_eq!(column(&rows, "n"), (11..=20).collect::<Vec<i64>>());
    assert_eq!(result.status(), PageStatus::HasMorePage);
}

#[test]
fn test_query_source_binds_params() {
    let conn = numbers_db();
    let mut result = result_for(1, 5, 0);
    let min: Option<i32> = Some(90);
    let max: Option<i32> = None;

    let mut source = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n > ?")
        .with_param_if_some(min)
        .with_param_if_some(max)
        .with_sort(Sort::asc("n"));
    assert_eq!(source.params().len(), 1);

    let rows = run_paging(&mut source, &mut result, FetchPhase::FromEnd).unwrap();

    assert_eq!(column(&rows, "n"), (91..=95).collect::<Vec<i64>>());
    assert_eq!(result.status(), PageStatus::HasMorePage);
    assert_eq!(result.extra_pages_available(), 0);
}

#[test]
fn test_query_source_params_reused_on_fallback() {
    let conn = numbers_db();
    let mut params = crate::query::QueryParams::new();
    params.push(50);
    params.push("n".to_string());
    let mut result = result_for(9, 10, 0);

    let mut source = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n <= ? AND 'n' = ?")
        .with_params(params)
        .with_sort(Sort::asc("n"));

    let rows = run_paging(&mut source, &mut result, FetchPhase::FromEnd).unwrap();

    assert_eq!(column(&rows, "n"), (41..=50).collect::<Vec<i64>>());
    assert_eq!(result.status(), PageStatus::ReachedLastPage);
    assert_eq!(result.resolved_page(), 5);
}

#[test]
fn test_page_query_middle_page() {
    let conn = numbers_db();
    let mut result = result_for(5, 10, 3);

    let rows = page_query(
        &conn,
        "SELECT * FROM numbers",
        Some(Sort::asc("n")),
        &mut result,
        FetchPhase::FromEnd,
    )
    .unwrap();

    assert_eq!(column(&rows, "n"), (41..=50).collect::<Vec<i64>>());
    assert_eq!(result.status(), PageStatus::HasMorePage);
    assert_eq!(result.resolved_page(), 5);
    assert_eq!(result.extra_pages_available(), 3);
}

#[test]
fn test_page_query_falls_back_to_last_page() {
    let conn = numbers_db();
    let mut result = result_for(11, 10, 3);

    let rows = page_query(
        &conn,
        "SELECT * FROM numbers",
        Some(Sort::asc("n")),
        &mut result,
        FetchPhase::FromEnd,
    )
    .unwrap();

    assert_eq!(column(&rows, "n"), (91..=100).collect::<Vec<i64>>());
    assert_eq!(result.status(), PageStatus::ReachedLastPage);
    assert_eq!(result.resolved_page(), 10);
    assert!(result.request().unwrap().is_last_page());
}

#[test]
fn test_page_query_last_page_descending() {
    let conn = numbers_db();
    let mut result = PageResult::new(PageRequest::last_page(20, 3).unwrap()).unwrap();

    let rows = page_query(
        &conn,
        "SELECT * FROM numbers",
        Some(Sort::desc("n")),
        &mut result,
        FetchPhase::FromStart,
    )
    .unwrap();

    assert_eq!(column(&rows, "n"), (1..=20).rev().collect::<Vec<i64>>());
    assert_eq!(result.resolved_page(), 5);
}

#[test]
fn test_page_query_empty_table() {
    let conn = numbers_db();
    let mut result = result_for(3, 10, 0);

    let rows = page_query(
        &conn,
        "SELECT * FROM numbers WHERE n > 1000",
        None,
        &mut result,
        FetchPhase::FromEnd,
    )
    .unwrap();

    assert!(rows.is_empty());
    assert_eq!(result.status(), PageStatus::EmptyData);
    assert_eq!(result.resolved_page(), 0);
}

#[test]
fn test_page_query_database_error() {
    let conn = Connection::open_in_memory().unwrap();
    let mut result = result_for(1, 10, 0);

    let err = page_query(
        &conn,
        "SELECT * FROM missing_table",
        None,
        &mut result,
        FetchPhase::FromEnd,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
}

#[test]
fn test_query_source_single_result() {
    let conn = numbers_db();

    let mut one = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n = 7");
    assert_eq!(one.single_result().unwrap(), Some(json!({"n": 7})));

    let mut none = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n = 0");
    assert_eq!(none.single_result().unwrap(), None);

    let mut many = QuerySource::new(&conn, "SELECT * FROM numbers");
    assert!(matches!(
        many.single_result().unwrap_err(),
        Error::NonUniqueResult { count: 2 }
    ));
}

#[test]
fn test_query_source_incremental_lists() {
    let conn = numbers_db();
    let mut exact = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n = 500");
    let mut nearby = QuerySource::new(&conn, "SELECT * FROM numbers WHERE n > 97")
        .with_sort(Sort::desc("n"));

    let rows = first_non_empty::<JsonValue>(&mut [&mut exact, &mut nearby]).unwrap();

    assert_eq!(column(&rows, "n"), vec![100, 99, 98]);
    assert!(exact.list_result().unwrap().is_empty());
}

#[test]
fn test_query_rows_convert_column_types() {
    let conn = Connection::open_in_memory().unwrap();
    let mut source = QuerySource::new(
        &conn,
        "SELECT 'car' AS name, true AS active, 1.5::DOUBLE AS ratio, \
         CAST(NULL AS INTEGER) AS missing, DATE '2024-01-15' AS day, \
         TIMESTAMP '2024-01-15 10:30:00' AS seen_at, TIME '10:30:00' AS opens_at, \
         'abc'::BLOB AS payload",
    );

    let row = source.single_result().unwrap().unwrap();

    assert_eq!(
        row,
        json!({
            "name": "car",
            "active": true,
            "ratio": 1.5,
            "missing": null,
            "day": "2024-01-15",
            "seen_at": "2024-01-15T10:30:00.000000Z",
            "opens_at": "10:30:00.000000",
            "payload": "YWJj",
        })
    );
}

#[test]
fn test_duckdb_value_to_json_non_finite_double() {
    let value = super::query::duckdb_value_to_json(duckdb::types::Value::Double(f64::NAN));
    assert_eq!(value, JsonValue::Null);

    let value = super::query::duckdb_value_to_json(duckdb::types::Value::HugeInt(1 << 100));
    assert_eq!(value, json!("1267650600228229401496703205376"));
}

#[test]
fn test_duckdb_value_to_json_out_of_range_date() {
    let value = super::query::duckdb_value_to_json(duckdb::types::Value::Date32(i32::MAX));
    assert_eq!(value, json!(i32::MAX));

    let value = super::query::duckdb_value_to_json(duckdb::types::Value::Date32(i32::MIN));
    assert_eq!(value, json!(i32::MIN));
}

#[test]
fn test_page_query_infinite_dates() {
    let conn = Connection::open_in_memory().unwrap();
    let mut result = result_for(1, 10, 0);

    let rows = page_query(
        &conn,
        "SELECT 'infinity'::DATE AS d UNION ALL SELECT '-infinity'::DATE UNION ALL SELECT DATE '2024-01-15'",
        None,
        &mut result,
        FetchPhase::FromStart,
    )
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|row| row["d"].is_number()).count(), 2);
    assert!(rows.iter().any(|row| row["d"] == json!("2024-01-15")));
}
