//! Table metadata and write changesets shared by every content collection.
//!
//! A [`Collection`] is a row type plus a static [`CollectionSpec`] that
//! tells the list-query builder which columns may be searched, filtered and
//! sorted. An [`Editable`] collection additionally names its create/update
//! DTOs and the dependent rows that must go when a parent is deleted.

use archsite_core::error::CoreError;
use archsite_core::pagination::DEFAULT_PAGE_LIMIT;
use archsite_core::types::{DbId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Query metadata
// ---------------------------------------------------------------------------

/// How a raw query-string value is parsed for an exact-match filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Bool,
    Integer,
}

/// An exact-match filter recognised on a collection's list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Query-string key.
    pub param: &'static str,
    pub column: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn text(param: &'static str, column: &'static str) -> Self {
        Self { param, column, kind: FilterKind::Text }
    }

    pub const fn boolean(param: &'static str, column: &'static str) -> Self {
        Self { param, column, kind: FilterKind::Bool }
    }

    pub const fn integer(param: &'static str, column: &'static str) -> Self {
        Self { param, column, kind: FilterKind::Integer }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc|ascending|desc|descending` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, direction: SortDirection::Asc }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, direction: SortDirection::Desc }
    }
}

/// Manually ordered content: `sort_order` first, newest first on ties.
pub const CONTENT_ORDER: &[OrderTerm] = &[OrderTerm::asc("sort_order"), OrderTerm::desc("created_at")];

/// Inbox-like collections: newest first.
pub const NEWEST_FIRST: &[OrderTerm] = &[OrderTerm::desc("created_at")];

/// Static description of a table as seen by the list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub table: &'static str,
    /// Display name used in not-found errors, e.g. `"Partner"`.
    pub entity: &'static str,
    /// Lower-case noun used in conflict messages, e.g. `"partner"`.
    pub noun: &'static str,
    /// Comma-separated select list matching the row struct.
    pub columns: &'static str,
    pub search_columns: &'static [&'static str],
    pub filters: &'static [FilterField],
    pub sortable: &'static [&'static str],
    pub default_order: &'static [OrderTerm],
    pub default_limit: i64,
    pub published_column: Option<&'static str>,
    pub slug_column: Option<&'static str>,
}

impl CollectionSpec {
    pub const fn new(
        table: &'static str,
        entity: &'static str,
        noun: &'static str,
        columns: &'static str,
    ) -> Self {
        Self {
            table,
            entity,
            noun,
            columns,
            search_columns: &[],
            filters: &[],
            sortable: &[],
            default_order: NEWEST_FIRST,
            default_limit: DEFAULT_PAGE_LIMIT,
            published_column: None,
            slug_column: None,
        }
    }

    pub const fn searchable(self, search_columns: &'static [&'static str]) -> Self {
        Self { search_columns, ..self }
    }

    pub const fn filters(self, filters: &'static [FilterField]) -> Self {
        Self { filters, ..self }
    }

    pub const fn sortable(self, sortable: &'static [&'static str]) -> Self {
        Self { sortable, ..self }
    }

    pub const fn ordered_by(self, default_order: &'static [OrderTerm]) -> Self {
        Self { default_order, ..self }
    }

    pub const fn default_limit(self, default_limit: i64) -> Self {
        Self { default_limit, ..self }
    }

    pub const fn published(self, column: &'static str) -> Self {
        Self { published_column: Some(column), ..self }
    }

    pub const fn slugged(self, column: &'static str) -> Self {
        Self { slug_column: Some(column), ..self }
    }

    /// Look up a filter by its query-string key.
    pub fn filter(&self, param: &str) -> Option<&'static FilterField> {
        self.filters.iter().find(|f| f.param == param)
    }

    /// e.g. `"A partner with this slug already exists"`.
    pub fn slug_conflict_message(&self) -> String {
        let article = match self.noun.chars().next() {
            Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
            _ => "A",
        };
        format!("{article} {} with this slug already exists", self.noun)
    }
}

// ---------------------------------------------------------------------------
// Collection traits
// ---------------------------------------------------------------------------

/// A row type that can be listed and fetched generically.
pub trait Collection:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const SPEC: CollectionSpec;
}

/// What happens to a dependent row when its parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnParentDelete {
    Delete,
    Nullify,
}

/// A table holding a foreign key to the parent collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
    pub action: OnParentDelete,
}

impl Dependent {
    pub const fn delete(table: &'static str, column: &'static str) -> Self {
        Self { table, column, action: OnParentDelete::Delete }
    }

    pub const fn nullify(table: &'static str, column: &'static str) -> Self {
        Self { table, column, action: OnParentDelete::Nullify }
    }

    /// Statement run (with the parent id as `$1`) before the parent delete.
    pub fn cleanup_sql(&self) -> String {
        match self.action {
            OnParentDelete::Delete => {
                format!("DELETE FROM {} WHERE {} = $1", self.table, self.column)
            }
            OnParentDelete::Nullify => format!(
                "UPDATE {table} SET {column} = NULL WHERE {column} = $1",
                table = self.table,
                column = self.column
            ),
        }
    }
}

/// A collection that supports generic create/update/delete.
pub trait Editable: Collection {
    type Create: NewRecord;
    type Update: RecordPatch;

    /// Rows cleaned up, inside the delete transaction, before the parent.
    const DEPENDENTS: &'static [Dependent] = &[];

    fn id(&self) -> DbId;
}

/// Create DTO for an [`Editable`] collection.
pub trait NewRecord: DeserializeOwned + Send + Sync + 'static {
    /// Normalise the input (trim, derive the slug) before validation.
    fn prepare(&mut self) {}

    fn validate(&self) -> Result<(), CoreError>;

    /// Slug to check for uniqueness, if the collection has one.
    fn slug(&self) -> Option<&str> {
        None
    }

    fn changeset(&self) -> Changeset;
}

/// Partial-update DTO for an [`Editable`] collection.
pub trait RecordPatch: DeserializeOwned + Send + Sync + 'static {
    fn prepare(&mut self) {}

    fn validate(&self) -> Result<(), CoreError>;

    fn slug(&self) -> Option<&str> {
        None
    }

    /// Only the fields present in the request.
    fn changeset(&self) -> Changeset;
}

/// Trim an optional string, mapping blank values to `None`.
pub fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Changesets
// ---------------------------------------------------------------------------

/// A typed column value bound into an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Bool(Option<bool>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    TextArray(Vec<String>),
    Timestamp(Option<Timestamp>),
    Uuid(Option<Uuid>),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Bind this value as the next placeholder.
    pub fn push_bind(self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Text(v) => qb.push_bind(v),
            Self::Bool(v) => qb.push_bind(v),
            Self::Int(v) => qb.push_bind(v),
            Self::BigInt(v) => qb.push_bind(v),
            Self::TextArray(v) => qb.push_bind(v),
            Self::Timestamp(v) => qb.push_bind(v),
            Self::Uuid(v) => qb.push_bind(v),
            Self::Json(v) => qb.push_bind(v),
        };
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(Some(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(Some(v))
    }
}

impl From<Option<i32>> for FieldValue {
    fn from(v: Option<i32>) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::BigInt(Some(v))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(v: Option<i64>) -> Self {
        Self::BigInt(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::TextArray(v)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(Some(v))
    }
}

impl From<Option<Timestamp>> for FieldValue {
    fn from(v: Option<Timestamp>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(Some(v))
    }
}

impl From<Option<Uuid>> for FieldValue {
    fn from(v: Option<Uuid>) -> Self {
        Self::Uuid(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Ordered list of `(column, value)` pairs for one write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column unconditionally (`None` values write NULL).
    pub fn set(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    /// Set a column only when a value is present.
    pub fn set_some<V: Into<FieldValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    /// `INSERT INTO {table} (...) VALUES (...) RETURNING {returning}`.
    pub fn insert_query(&self, table: &str, returning: &str) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("INSERT INTO {table} ("));
        for (i, column) in self.columns().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column);
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            value.clone().push_bind(&mut qb);
        }
        qb.push(format!(") RETURNING {returning}"));
        qb
    }

    /// `UPDATE {table} SET ..., updated_at = NOW() WHERE id = $n RETURNING {returning}`.
    pub fn update_query(&self, table: &str, id: DbId, returning: &str) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("UPDATE {table} SET "));
        for (i, (column, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(format!("{column} = "));
            value.clone().push_bind(&mut qb);
        }
        qb.push(", updated_at = NOW()");
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {returning}"));
        qb
    }
}
