//! Pagination, search and sorting shared by every list endpoint.

use crate::errors::{AppError, AppResult};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// List request: 1-based page, optional search term and sort column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Static description of a listable table.
pub struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    pub search_columns: &'static [&'static str],
    /// Public sort key → SQL column.
    pub sortable: &'static [(&'static str, &'static str)],
    pub default_sort: &'static str,
}

/// Extra `WHERE` conditions with their positional values.
#[derive(Debug, Default)]
pub struct Filter {
    pub conditions: Vec<String>,
    pub values: Vec<Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(format!("{column} = ?"));
        self.values.push(value.into());
        self
    }

    pub fn between(mut self, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.conditions.push(format!("{column} >= ? AND {column} <= ?"));
        self.values.push(from.into());
        self.values.push(to.into());
        self
    }

    fn push_search(&mut self, columns: &[&str], term: &str) {
        let pattern = format!("%{}%", escape_like(term));
        let ors: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
            .collect();
        self.conditions.push(format!("({})", ors.join(" OR ")));
        for _ in columns {
            self.values.push(Value::Text(pattern.clone()));
        }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl ListQuery {
    pub fn resolve_page(&self) -> AppResult<u32> {
        match self.page {
            None => Ok(1),
            Some(0) => Err(AppError::Validation("page numbers start at 1".into())),
            Some(p) => Ok(p),
        }
    }

    /// Requested page size, falling back to `default`, capped at [`MAX_PER_PAGE`].
    pub fn resolve_per_page(&self, default: u32) -> AppResult<u32> {
        match self.per_page.unwrap_or(default) {
            0 => Err(AppError::Validation("per_page must be at least 1".into())),
            n => Ok(n.min(MAX_PER_PAGE)),
        }
    }

    fn order_by(&self, spec: &ListSpec) -> AppResult<String> {
        let key = self.sort.as_deref().unwrap_or(spec.default_sort);
        let column = spec
            .sortable
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, c)| *c)
            .ok_or_else(|| AppError::InvalidSort(key.to_string()))?;

        let dir = self.order.sql();
        Ok(format!(" ORDER BY {column} {dir}, id {dir}"))
    }
}

/// Run a paginated query against `spec.table`.
pub fn fetch_page<T, F>(
    conn: &Connection,
    spec: &ListSpec,
    mut filter: Filter,
    query: &ListQuery,
    default_per_page: u32,
    map: F,
) -> AppResult<Page<T>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let page = query.resolve_page()?;
    let per_page = query.resolve_per_page(default_per_page)?;
    let order_by = query.order_by(spec)?;

    if let Some(term) = query.search.as_deref().map(str::trim)
        && !term.is_empty()
    {
        filter.push_search(spec.search_columns, term);
    }

    let where_clause = filter.where_clause();

    let total: u64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}{}", spec.table, where_clause),
        params_from_iter(filter.values.iter()),
        |row| row.get::<_, i64>(0),
    )? as u64;

    let sql = format!(
        "SELECT {} FROM {}{}{} LIMIT ? OFFSET ?",
        spec.columns, spec.table, where_clause, order_by
    );

    let offset = (page as i64 - 1) * per_page as i64;
    let mut values = filter.values;
    values.push(Value::Integer(per_page as i64));
    values.push(Value::Integer(offset));

    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_from_iter(values.iter()), map)?
        .collect::<Result<Vec<_>, _>>()?;

    let total_pages = total.div_ceil(per_page as u64) as u32;

    Ok(Page {
        items,
        total,
        page,
        per_page,
        total_pages,
    })
}
