//! Channel repository.

use chrono::{DateTime, Utc};

use super::types::{Channel, NewChannel};
use crate::db::{parse_datetime, DbPool};
use crate::{FeedSyncError, Result};

/// Row type for a channel from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChannelRow {
    id: i64,
    url: String,
    title: Option<String>,
    last_build_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        Channel {
            id: row.id,
            url: row.url,
            title: row.title,
            last_build_date: row.last_build_date.and_then(|s| parse_datetime(&s)),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

const SELECT_CHANNEL: &str = r#"
    SELECT id, url, title, last_build_date, created_at, updated_at
    FROM channels
"#;

/// Repository for channel operations.
pub struct ChannelRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ChannelRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new channel.
    pub async fn create(&self, channel: &NewChannel) -> Result<Channel> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO channels (url, title)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&channel.url)
        .bind(&channel.title)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| FeedSyncError::NotFound("channel".into()))
    }

    /// Get a channel by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Channel>> {
        let query = format!("{SELECT_CHANNEL} WHERE id = $1");
        let row = sqlx::query_as::<_, ChannelRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Channel::from))
    }

    /// Get a channel by feed URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Channel>> {
        let query = format!("{SELECT_CHANNEL} WHERE url = $1");
        let row = sqlx::query_as::<_, ChannelRow>(&query)
            .bind(url)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Channel::from))
    }

    /// List all channels (ordered by registration order).
    pub async fn list_all(&self) -> Result<Vec<Channel>> {
        let query = format!("{SELECT_CHANNEL} ORDER BY id ASC");
        let rows = sqlx::query_as::<_, ChannelRow>(&query)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Channel::from).collect())
    }

    /// Record the feed build time the channel was last synchronized against.
    pub async fn update_last_build_date(
        &self,
        id: i64,
        last_build_date: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE channels
            SET last_build_date = $1, updated_at = datetime('now')
            WHERE id = $2
            "#,
        )
        .bind(last_build_date.to_rfc3339())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all channels.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM channels")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
