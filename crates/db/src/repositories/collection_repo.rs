//! Generic CRUD over any [`Collection`].
//!
//! Rows are fetched as `PgRow` and decoded through the collection's
//! `FromRow` impl, so the SQL is assembled once per call from the
//! collection's static spec and the request's changeset.

use archsite_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::collection::{Changeset, Collection, CollectionSpec, Editable};
use crate::list_query::{ListQuery, Page};

/// Provides list, lookup, insert, update and cascade delete for any
/// collection.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Fetch one page of a collection.
    pub async fn list<C: Collection>(pool: &PgPool, query: &ListQuery) -> Result<Page<C>, sqlx::Error> {
        query.fetch::<C>(pool).await
    }

    /// Find a row by its primary key.
    pub async fn find_by_id<C: Collection>(pool: &PgPool, id: DbId) -> Result<Option<C>, sqlx::Error> {
        let spec = C::SPEC;
        let sql = format!("SELECT {} FROM {} WHERE id = $1", spec.columns, spec.table);
        let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
        decode_optional(row)
    }

    /// Find a row by slug. With `published_only`, unpublished rows are
    /// treated as absent. Collections without a slug never match.
    pub async fn find_by_slug<C: Collection>(
        pool: &PgPool,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<C>, sqlx::Error> {
        let spec = C::SPEC;
        let Some(slug_column) = spec.slug_column else {
            return Ok(None);
        };
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {slug_column} = $1",
            spec.columns, spec.table
        );
        if published_only {
            if let Some(published) = spec.published_column {
                sql.push_str(&format!(" AND {published} = TRUE"));
            }
        }
        let row = sqlx::query(&sql).bind(slug).fetch_optional(pool).await?;
        decode_optional(row)
    }

    /// Whether another row already uses `slug`. `exclude_id` skips the row
    /// being updated.
    pub async fn slug_exists(
        pool: &PgPool,
        spec: &CollectionSpec,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let Some(slug_column) = spec.slug_column else {
            return Ok(false);
        };
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {slug_column} = $1 \
             AND ($2::BIGINT IS NULL OR id <> $2))",
            spec.table
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a row built from `changeset` and return it.
    pub async fn insert<C: Collection>(pool: &PgPool, changeset: &Changeset) -> Result<C, sqlx::Error> {
        let spec = C::SPEC;
        let mut qb = changeset.insert_query(spec.table, spec.columns);
        let row = qb.build().fetch_one(pool).await?;
        C::from_row(&row)
    }

    /// Apply a partial update. Returns `None` if no row has that id.
    ///
    /// An empty changeset is a caller bug; handlers reject it before
    /// reaching here.
    pub async fn update<C: Editable>(
        pool: &PgPool,
        id: DbId,
        changeset: &Changeset,
    ) -> Result<Option<C>, sqlx::Error> {
        let spec = C::SPEC;
        let mut qb = changeset.update_query(spec.table, id, spec.columns);
        let row = qb.build().fetch_optional(pool).await?;
        decode_optional(row)
    }

    /// Delete a row and clean up its dependents in one transaction.
    ///
    /// Returns `false` (and changes nothing) if no row has that id. Any
    /// failure rolls back every statement.
    pub async fn delete<C: Editable>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let spec = C::SPEC;
        let mut tx = pool.begin().await?;

        for dependent in C::DEPENDENTS {
            let affected = sqlx::query(&dependent.cleanup_sql())
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(
                table = dependent.table,
                column = dependent.column,
                action = ?dependent.action,
                affected,
                "Cleaned up dependent rows"
            );
        }

        let sql = format!("DELETE FROM {} WHERE id = $1", spec.table);
        let deleted = sqlx::query(&sql).bind(id).execute(&mut *tx).await?.rows_affected() > 0;

        if deleted {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(deleted)
    }
}

fn decode_optional<C: Collection>(row: Option<PgRow>) -> Result<Option<C>, sqlx::Error> {
    row.as_ref().map(|r| C::from_row(r)).transpose()
}
