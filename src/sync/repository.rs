//! Storage operations needed by a synchronization run.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::article::{Article, ArticleRepository, NewArticle};
use crate::channel::ChannelRepository;
use crate::db::Database;
use crate::{FeedSyncError, Result};

/// Storage seen by the synchronizer.
///
/// [`Database`] implements it on top of the SQL repositories; tests can
/// substitute an in-memory store.
pub trait SyncRepository: Sync {
    /// Find an article by guid, in any channel.
    fn find_article_by_guid(
        &self,
        guid: &str,
    ) -> impl Future<Output = Result<Option<Article>>> + Send;

    /// Validate and persist a new article.
    fn create_article(&self, article: &NewArticle) -> impl Future<Output = Result<Article>> + Send;

    /// Record the feed build time a channel was synchronized against.
    fn update_channel_build_date(
        &self,
        channel_id: i64,
        last_build_date: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl SyncRepository for Database {
    async fn find_article_by_guid(&self, guid: &str) -> Result<Option<Article>> {
        ArticleRepository::new(self.pool()).get_by_guid(guid).await
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        ArticleRepository::new(self.pool()).create(article).await
    }

    async fn update_channel_build_date(
        &self,
        channel_id: i64,
        last_build_date: DateTime<Utc>,
    ) -> Result<()> {
        let updated = ChannelRepository::new(self.pool())
            .update_last_build_date(channel_id, last_build_date)
            .await?;
        if !updated {
            return Err(FeedSyncError::NotFound(format!("channel {channel_id}")));
        }
        Ok(())
    }
}
