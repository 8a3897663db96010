/// All content primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Profile ids are the auth provider's subject UUIDs.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
