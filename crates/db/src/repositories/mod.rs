//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. [`CollectionRepo`] covers the
//! plain CRUD every content table shares; the others hold the queries that
//! only make sense for one table.

pub mod activity_log_repo;
pub mod collection_repo;
pub mod dashboard_repo;
pub mod media_repo;
pub mod newsletter_repo;
pub mod profile_repo;
pub mod project_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use collection_repo::CollectionRepo;
pub use dashboard_repo::{DashboardCounts, DashboardRepo};
pub use media_repo::MediaRepo;
pub use newsletter_repo::{NewsletterRepo, SubscribeOutcome};
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
