//! Scalar aliases shared by the persistence and API layers.

/// Wallpaper primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Record timestamps, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
