//! Aggregate queries over the `media` table.

use sqlx::PgPool;

use crate::models::media::{mime_major, MediaStats};

/// Provides library-wide statistics for media.
pub struct MediaRepo;

impl MediaRepo {
    /// Total files, total bytes and counts per MIME major type.
    pub async fn stats(pool: &PgPool) -> Result<MediaStats, sqlx::Error> {
        let rows: Vec<(Option<String>, i64, i64)> = sqlx::query_as(
            "SELECT mime_type, COUNT(*)::BIGINT, COALESCE(SUM(size_bytes), 0)::BIGINT \
             FROM media GROUP BY mime_type",
        )
        .fetch_all(pool)
        .await?;

        let mut stats = MediaStats::default();
        for (mime, count, bytes) in rows {
            stats.total_files += count;
            stats.total_bytes += bytes;
            *stats
                .by_type
                .entry(mime_major(mime.as_deref()).to_owned())
                .or_insert(0) += count;
        }
        Ok(stats)
    }
}
