//! Article repository.

use chrono::Utc;

use super::types::{Article, NewArticle};
use crate::db::{parse_datetime, DbPool};
use crate::{FeedSyncError, Result};

/// Row type for an article from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    channel_id: i64,
    guid: String,
    title: String,
    description: Option<String>,
    content: Option<String>,
    published_at: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
    created_at: String,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            channel_id: row.channel_id,
            guid: row.guid,
            title: row.title,
            description: row.description,
            content: row.content,
            published_at: row.published_at.and_then(|s| parse_datetime(&s)),
            url: row.url,
            image_url: row.image_url,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

const SELECT_ARTICLE: &str = r#"
    SELECT id, channel_id, guid, title, description, content, published_at,
           url, image_url, created_at
    FROM articles
"#;

/// Repository for article operations.
pub struct ArticleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new article.
    ///
    /// The article is validated first. A guid that already exists, in any
    /// channel, violates the unique index and fails with a database error.
    pub async fn create(&self, article: &NewArticle) -> Result<Article> {
        article.validate()?;

        let published_at = article.published_at.map(|dt| dt.to_rfc3339());
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (channel_id, guid, title, description, content,
                                  published_at, url, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(article.channel_id)
        .bind(&article.guid)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.content)
        .bind(&published_at)
        .bind(&article.url)
        .bind(&article.image_url)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| FeedSyncError::NotFound("article".into()))
    }

    /// Get an article by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let query = format!("{SELECT_ARTICLE} WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    /// Get an article by guid, whichever channel it belongs to.
    pub async fn get_by_guid(&self, guid: &str) -> Result<Option<Article>> {
        let query = format!("{SELECT_ARTICLE} WHERE guid = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(guid)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    /// List a channel's articles (newest first).
    pub async fn list_by_channel(&self, channel_id: i64) -> Result<Vec<Article>> {
        let query = format!(
            "{SELECT_ARTICLE} WHERE channel_id = $1 \
             ORDER BY COALESCE(published_at, created_at) DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(channel_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Count a channel's articles.
    pub async fn count_by_channel(&self, channel_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE channel_id = $1")
            .bind(channel_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count all articles.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
