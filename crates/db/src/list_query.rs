//! List-query builder: turns request parameters into one bounded, filtered,
//! ordered SELECT over a [`Collection`] and wraps the rows in a [`Page`].
//!
//! Everything the caller passes in is checked against the collection's
//! [`CollectionSpec`]: unknown filter keys, unsortable columns and values
//! that do not parse are dropped rather than rejected. Identifiers in the
//! generated SQL only ever come from the static spec; request values are
//! always bound.

use archsite_core::pagination::{PageRequest, Pagination};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::collection::{Collection, CollectionSpec, FilterKind, OrderTerm, SortDirection};

/// A page of rows plus its pagination block.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// An empty page for `request` (total 0).
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::empty(request),
        }
    }
}

/// A parsed exact-match filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Integer(i64),
}

impl FilterValue {
    /// Parse a raw query-string value for the given kind.
    pub fn parse(kind: FilterKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match kind {
            FilterKind::Text => Some(Self::Text(raw.to_owned())),
            FilterKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(Self::Bool(true)),
                "false" | "0" | "no" => Some(Self::Bool(false)),
                _ => None,
            },
            FilterKind::Integer => raw.parse().ok().map(Self::Integer),
        }
    }

    fn push_bind(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Text(v) => qb.push_bind(v.clone()),
            Self::Bool(v) => qb.push_bind(*v),
            Self::Integer(v) => qb.push_bind(*v),
        };
    }
}

/// Escape `LIKE` metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A list request resolved against a collection spec.
#[derive(Debug, Clone)]
pub struct ListQuery {
    spec: CollectionSpec,
    search: Option<String>,
    filters: Vec<(&'static str, FilterValue)>,
    published_only: bool,
    sort: Option<OrderTerm>,
    page: PageRequest,
}

impl ListQuery {
    pub fn new(spec: CollectionSpec) -> Self {
        Self {
            spec,
            search: None,
            filters: Vec::new(),
            published_only: false,
            sort: None,
            page: PageRequest::new(None, None, spec.default_limit),
        }
    }

    pub fn for_collection<C: Collection>() -> Self {
        Self::new(C::SPEC)
    }

    /// Case-insensitive substring search across the collection's search columns.
    /// Blank terms, and collections without search columns, are ignored.
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .map(str::trim)
            .filter(|t| !t.is_empty() && !self.spec.search_columns.is_empty())
            .map(str::to_owned);
        self
    }

    /// Add an exact-match filter by query-string key.
    pub fn filter(mut self, param: &str, raw: &str) -> Self {
        let Some(field) = self.spec.filter(param) else {
            return self;
        };
        let Some(value) = FilterValue::parse(field.kind, raw) else {
            return self;
        };
        self.filters.retain(|(column, _)| *column != field.column);
        self.filters.push((field.column, value));
        self
    }

    pub fn filters<'a>(self, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        params
            .into_iter()
            .fold(self, |query, (param, raw)| query.filter(param, raw))
    }

    /// Restrict to published rows. Caller filters on the publish column are
    /// then ignored.
    pub fn published_only(mut self) -> Self {
        self.published_only = self.spec.published_column.is_some();
        self
    }

    /// Caller-requested ordering; unsortable columns are ignored.
    pub fn sort(mut self, column: Option<&str>, order: Option<&str>) -> Self {
        let column = column.map(str::trim).and_then(|c| {
            self.spec.sortable.iter().copied().find(|s| *s == c)
        });
        self.sort = column.map(|column| OrderTerm {
            column,
            direction: order
                .and_then(SortDirection::parse)
                .unwrap_or(SortDirection::Asc),
        });
        self
    }

    pub fn page(mut self, page: Option<i64>, limit: Option<i64>) -> Self {
        self.page = PageRequest::new(page, limit, self.spec.default_limit);
        self
    }

    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    pub fn spec(&self) -> &CollectionSpec {
        &self.spec
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let mut first = true;
        let mut clause = |qb: &mut QueryBuilder<'static, Postgres>| {
            qb.push(if first { " WHERE " } else { " AND " });
            first = false;
        };

        let published_column = self.published_only.then_some(self.spec.published_column).flatten();
        if let Some(column) = published_column {
            clause(qb);
            qb.push(format!("{column} = TRUE"));
        }

        if let Some(term) = &self.search {
            let pattern = format!("%{}%", escape_like(term));
            clause(qb);
            qb.push("(");
            for (i, column) in self.spec.search_columns.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(format!("{column} ILIKE "));
                qb.push_bind(pattern.clone());
            }
            qb.push(")");
        }

        for (column, value) in &self.filters {
            if Some(*column) == published_column {
                continue;
            }
            clause(qb);
            qb.push(format!("{column} = "));
            value.push_bind(qb);
        }
    }

    fn order_terms(&self) -> Vec<OrderTerm> {
        let mut terms: Vec<OrderTerm> = self.sort.into_iter().collect();
        for term in self.spec.default_order {
            if !terms.iter().any(|t| t.column == term.column) {
                terms.push(*term);
            }
        }
        terms
    }

    /// The page SELECT, with the exact total attached to every row as
    /// `total_count`.
    pub fn build_select(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {}, COUNT(*) OVER() AS total_count FROM {}",
            self.spec.columns, self.spec.table
        ));
        self.push_where(&mut qb);

        let order = self.order_terms();
        if !order.is_empty() {
            qb.push(" ORDER BY ");
            for (i, term) in order.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(format!("{} {}", term.column, term.direction.as_sql()));
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(self.page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(self.page.offset());
        qb
    }

    /// `COUNT(*)` over the same predicates, for pages past the end.
    pub fn build_count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.spec.table));
        self.push_where(&mut qb);
        qb
    }

    /// Run the query and decode one page of `C`.
    ///
    /// The total rides along with the rows; only a page past the end (no
    /// rows, non-zero offset) costs a second `COUNT(*)` round trip.
    pub async fn fetch<C: Collection>(&self, pool: &PgPool) -> Result<Page<C>, sqlx::Error> {
        let mut select = self.build_select();
        let rows = select.build().fetch_all(pool).await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")?,
            None if self.page.offset() > 0 => {
                let mut count = self.build_count();
                count.build_query_scalar::<i64>().fetch_one(pool).await?
            }
            None => 0,
        };

        let data = rows
            .iter()
            .map(|row| C::from_row(row))
            .collect::<Result<Vec<C>, _>>()?;

        tracing::debug!(
            table = self.spec.table,
            page = self.page.page,
            limit = self.page.limit,
            total,
            returned = data.len(),
            "Listed collection page"
        );

        Ok(Page {
            data,
            pagination: Pagination::new(self.page, total),
        })
    }
}
