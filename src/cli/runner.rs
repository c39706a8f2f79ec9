//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{self, load_config, PagingConfig};
use crate::error::{Error, Result};
use crate::pagination::{FetchPhase, PageRequest, PageResult, PageStatus};
use crate::query::{Sort, SortDirection};
use crate::source::{page_list, page_query};
use crate::types::{JsonValue, OptionStringExt};
use serde::Serialize;
use serde_json::json;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of the `page` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOutput {
    /// Request the rows were resolved against
    pub request: PageRequest,
    /// Paging status
    pub status: PageStatus,
    /// Page the rows belong to
    pub resolved_page: i32,
    /// Pages confirmed after the resolved page
    pub extra_pages_available: i32,
    /// Rows of the resolved page
    pub rows: Vec<JsonValue>,
}

/// Where the `page` command reads rows from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// JSON file holding an array of rows
    Json(PathBuf),
    /// DuckDB database and base query
    Query {
        /// Database file or `:memory:`
        database: String,
        /// Base SELECT statement
        sql: String,
    },
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: PagingConfig,
}

impl Runner {
    /// Create a new runner, loading the config file if one was given
    pub fn new(cli: Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => PagingConfig::default(),
        };
        Ok(Self { cli, config })
    }

    /// Loaded config
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Log level from `--verbose`, then the config file, then INFO
    pub fn log_level(&self) -> tracing::Level {
        if self.cli.verbose {
            return tracing::Level::DEBUG;
        }
        self.config
            .log_level
            .map_or(tracing::Level::INFO, tracing::Level::from)
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Plan {
                page,
                size,
                lookahead,
            } => {
                let plan = self.plan(*page, *size, *lookahead)?;
                self.output_message(&plan)
            }
            Commands::Page {
                json,
                database,
                query,
                page,
                size,
                lookahead,
                two_phase,
                sort,
            } => {
                let source =
                    self.resolve_source(json.as_deref(), database.as_deref(), query.as_deref())?;
                let request = self.build_request(*page, *size, *lookahead)?;
                let phase = if *two_phase || self.config.two_phase {
                    FetchPhase::FromEnd
                } else {
                    FetchPhase::FromStart
                };
                let sort = sort.clone().or_else(|| self.config.sort.clone());

                let output = Self::page(&source, request, phase, sort)?;
                self.output_message(&output)
            }
        }
    }

    /// Describe the window a request would fetch
    pub fn plan(
        &self,
        page: i32,
        size: Option<i32>,
        lookahead: Option<i32>,
    ) -> Result<JsonValue> {
        let request = self.build_request(page, size, lookahead)?;
        let result = PageResult::new(request)?;

        Ok(json!({
            "request": request,
            "first_record_offset": result.first_record_offset()?,
            "last_record_limit": result.last_record_limit()?,
            "has_previous_page": request.has_previous_page()?,
        }))
    }

    /// Fetch one page from `source`
    pub fn page(
        source: &PageSource,
        request: PageRequest,
        phase: FetchPhase,
        sort: Option<Sort>,
    ) -> Result<PageOutput> {
        let mut result = PageResult::new(request)?;

        let rows = match source {
            PageSource::Json(path) => {
                let mut rows = load_json_rows(path)?;
                if let Some(sort) = &sort {
                    sort_rows(&mut rows, sort);
                }
                page_list(&rows, &mut result, phase)?
            }
            PageSource::Query { database, sql } => {
                let conn = config::open_database(database)?;
                page_query(&conn, sql, sort, &mut result, phase)?
            }
        };

        tracing::info!(
            status = %result.status(),
            resolved_page = result.resolved_page(),
            rows = rows.len(),
            "Paging finished"
        );

        Ok(PageOutput {
            request: result.request()?,
            status: result.status(),
            resolved_page: result.resolved_page(),
            extra_pages_available: result.extra_pages_available(),
            rows,
        })
    }

    /// Request from command-line values, falling back to the config
    fn build_request(
        &self,
        page: i32,
        size: Option<i32>,
        lookahead: Option<i32>,
    ) -> Result<PageRequest> {
        let config = PagingConfig {
            page_size: size.unwrap_or(self.config.page_size),
            lookahead_pages: lookahead.unwrap_or(self.config.lookahead_pages),
            ..self.config.clone()
        };
        config.page_request(page)
    }

    /// Source from command-line values, falling back to the config
    fn resolve_source(
        &self,
        json: Option<&Path>,
        database: Option<&str>,
        query: Option<&str>,
    ) -> Result<PageSource> {
        if let Some(path) = json {
            return Ok(PageSource::Json(path.to_path_buf()));
        }

        let configured = self.config.source.as_ref();
        let sql = query
            .map(str::to_string)
            .or_else(|| configured.map(|source| source.query.clone()))
            .none_if_blank()
            .ok_or_else(|| Error::config("No source given (use --json FILE or --query SQL)"))?;
        let database = database
            .map(str::to_string)
            .or_else(|| configured.map(|source| source.database.clone()))
            .unwrap_or_else(|| config::IN_MEMORY_DATABASE.to_string());

        Ok(PageSource::Query { database, sql })
    }

    /// Output a message
    fn output_message<T: Serialize>(&self, msg: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Read a JSON array of rows
fn load_json_rows(path: &Path) -> Result<Vec<JsonValue>> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read JSON file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let value: JsonValue = serde_json::from_str(&content)?;
    match value {
        JsonValue::Array(rows) => Ok(rows),
        _ => Err(Error::config(format!(
            "JSON file '{}' must hold an array of rows",
            path.display()
        ))),
    }
}

/// Sort JSON rows on a top-level field; rows missing the field sort first
fn sort_rows(rows: &mut [JsonValue], sort: &Sort) {
    let Some(key) = &sort.key else {
        return;
    };

    rows.sort_by(|a, b| {
        let ordering = compare_json(a.get(key), b.get(key));
        match sort.direction.unwrap_or_default() {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_json(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None | Some(JsonValue::Null), None | Some(JsonValue::Null)) => Ordering::Equal,
        (None | Some(JsonValue::Null), _) => Ordering::Less,
        (_, None | Some(JsonValue::Null)) => Ordering::Greater,
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
