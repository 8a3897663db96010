//! Repository for the `newsletter_subscribers` table.

use archsite_core::types::DbId;
use archsite_core::validation::{SUBSCRIBER_STATUS_SUBSCRIBED, SUBSCRIBER_STATUS_UNSUBSCRIBED};
use sqlx::PgPool;

use crate::collection::Collection;
use crate::models::newsletter_subscriber::NewsletterSubscriber;

/// What `subscribe` did with the address.
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    /// A new row was inserted.
    Created(NewsletterSubscriber),
    /// A previously unsubscribed address was re-activated.
    Resubscribed(NewsletterSubscriber),
    /// The address is already subscribed; nothing changed.
    AlreadySubscribed,
}

/// Provides lookup and subscription state changes for subscribers.
pub struct NewsletterRepo;

impl NewsletterRepo {
    /// Find a subscriber by (already normalised) email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM newsletter_subscribers WHERE email = $1",
            NewsletterSubscriber::SPEC.columns
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Subscribe an address, inserting it or re-activating an unsubscribed
    /// row.
    pub async fn subscribe(
        pool: &PgPool,
        email: &str,
        name: Option<&str>,
    ) -> Result<SubscribeOutcome, sqlx::Error> {
        let columns = NewsletterSubscriber::SPEC.columns;

        if let Some(existing) = Self::find_by_email(pool, email).await? {
            if existing.status == SUBSCRIBER_STATUS_SUBSCRIBED {
                return Ok(SubscribeOutcome::AlreadySubscribed);
            }
            let query = format!(
                "UPDATE newsletter_subscribers SET \
                    status = $2, \
                    name = COALESCE($3, name), \
                    subscribed_at = NOW(), \
                    unsubscribed_at = NULL, \
                    updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING {columns}"
            );
            let row = sqlx::query_as::<_, NewsletterSubscriber>(&query)
                .bind(existing.id)
                .bind(SUBSCRIBER_STATUS_SUBSCRIBED)
                .bind(name)
                .fetch_one(pool)
                .await?;
            return Ok(SubscribeOutcome::Resubscribed(row));
        }

        // A concurrent insert of the same address loses on the unique
        // constraint and surfaces as a conflict.
        let query = format!(
            "INSERT INTO newsletter_subscribers (email, name, status) \
             VALUES ($1, $2, $3) \
             RETURNING {columns}"
        );
        let row = sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .bind(name)
            .bind(SUBSCRIBER_STATUS_SUBSCRIBED)
            .fetch_one(pool)
            .await?;
        Ok(SubscribeOutcome::Created(row))
    }

    /// Mark an address unsubscribed. Returns `None` for unknown addresses.
    ///
    /// Unsubscribing twice is harmless; the original timestamp is kept.
    pub async fn unsubscribe(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletter_subscribers SET \
                status = $2, \
                unsubscribed_at = COALESCE(unsubscribed_at, NOW()), \
                updated_at = NOW() \
             WHERE email = $1 \
             RETURNING {}",
            NewsletterSubscriber::SPEC.columns
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .bind(SUBSCRIBER_STATUS_UNSUBSCRIBED)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a subscriber by id.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
