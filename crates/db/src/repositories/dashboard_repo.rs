//! Admin dashboard counters.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Row counts shown on the admin overview.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardCounts {
    pub projects: i64,
    pub published_projects: i64,
    pub project_categories: i64,
    pub team_members: i64,
    pub services: i64,
    pub partners: i64,
    pub explore_content: i64,
    pub careers: i64,
    pub open_careers: i64,
    pub media: i64,
    pub contact_submissions: i64,
    pub unread_contact_submissions: i64,
    pub active_subscribers: i64,
}

pub struct DashboardRepo;

impl DashboardRepo {
    /// All counters in one round trip.
    pub async fn counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT \
                (SELECT COUNT(*) FROM projects)::BIGINT AS projects, \
                (SELECT COUNT(*) FROM projects WHERE is_published)::BIGINT AS published_projects, \
                (SELECT COUNT(*) FROM project_categories)::BIGINT AS project_categories, \
                (SELECT COUNT(*) FROM team_members)::BIGINT AS team_members, \
                (SELECT COUNT(*) FROM services)::BIGINT AS services, \
                (SELECT COUNT(*) FROM partners)::BIGINT AS partners, \
                (SELECT COUNT(*) FROM explore_content)::BIGINT AS explore_content, \
                (SELECT COUNT(*) FROM careers)::BIGINT AS careers, \
                (SELECT COUNT(*) FROM careers WHERE is_published \
                    AND (closes_at IS NULL OR closes_at > NOW()))::BIGINT AS open_careers, \
                (SELECT COUNT(*) FROM media)::BIGINT AS media, \
                (SELECT COUNT(*) FROM contact_submissions)::BIGINT AS contact_submissions, \
                (SELECT COUNT(*) FROM contact_submissions WHERE status = 'new')::BIGINT \
                    AS unread_contact_submissions, \
                (SELECT COUNT(*) FROM newsletter_subscribers WHERE status = 'subscribed')::BIGINT \
                    AS active_subscribers",
        )
        .fetch_one(pool)
        .await
    }
}
