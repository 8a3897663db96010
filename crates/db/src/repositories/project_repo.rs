//! Project-specific queries: the partner join table and the detail view.

use archsite_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::collection::Collection;
use crate::models::partner::Partner;
use crate::models::project::{Project, ProjectDetail};
use crate::models::project_category::ProjectCategory;
use crate::repositories::CollectionRepo;

/// Provides queries over `project_partners` and the composed project view.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Partners linked to a project, in partner display order.
    pub async fn partners_for(
        pool: &PgPool,
        project_id: DbId,
        published_only: bool,
    ) -> Result<Vec<Partner>, sqlx::Error> {
        let columns = Partner::SPEC
            .columns
            .split(',')
            .map(|c| format!("p.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let published = if published_only {
            " AND p.is_published = TRUE"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {columns} FROM partners p \
             JOIN project_partners pp ON pp.partner_id = p.id \
             WHERE pp.project_id = $1{published} \
             ORDER BY p.sort_order ASC, p.created_at DESC"
        );
        let rows = sqlx::query(&sql).bind(project_id).fetch_all(pool).await?;
        rows.iter().map(|row| Partner::from_row(row)).collect()
    }

    /// Replace the full partner set of a project. All-or-nothing.
    ///
    /// Duplicate ids in `partner_ids` are linked once.
    pub async fn replace_partners(
        pool: &PgPool,
        project_id: DbId,
        partner_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_partners WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        if !partner_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_partners (project_id, partner_id) \
                 SELECT $1, UNNEST($2::BIGINT[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(project_id)
            .bind(partner_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// A project with its category and partners, looked up by slug.
    pub async fn detail(
        pool: &PgPool,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = CollectionRepo::find_by_slug::<Project>(pool, slug, published_only).await?
        else {
            return Ok(None);
        };

        let category = match project.category_id {
            Some(id) => CollectionRepo::find_by_id::<ProjectCategory>(pool, id)
                .await?
                .filter(|c| c.is_published || !published_only),
            None => None,
        };
        let partners = Self::partners_for(pool, project.id, published_only).await?;

        Ok(Some(ProjectDetail {
            project,
            category,
            partners,
        }))
    }
}
