use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::entities::Article;

/// Persistence seam for articles. The pipeline only needs "insert or
/// overwrite on url collision" and "delete older than"; everything else the
/// store does is somebody else's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Upsert one bounded batch keyed on url. Returns the number of rows
    /// acknowledged by the store.
    async fn upsert_batch(&self, articles: &[Article]) -> Result<u64>;

    /// Delete every article whose publish instant precedes `cutoff`,
    /// unconditionally by age. Returns the number of rows removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Number of stored rows sharing this url. At most 1 by schema; exposed
    /// for health checks and tests.
    async fn count_by_url(&self, url: &str) -> Result<i64>;
}

/// PostgreSQL-backed store. The `articles` table carries a primary key on
/// `url`, which is what makes repeated ingestion of the same item converge
/// onto a single row.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    #[instrument(skip_all, fields(batch_len = articles.len()))]
    async fn upsert_batch(&self, articles: &[Article]) -> Result<u64> {
        if articles.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO articles \
             (url, guid, title, source_name, orientation, tags, published_at, summary, image_url) ",
        );
        builder.push_values(articles, |mut row, article| {
            row.push_bind(&article.url)
                .push_bind(&article.guid)
                .push_bind(&article.title)
                .push_bind(&article.source_name)
                .push_bind(article.orientation.as_str())
                .push_bind(&article.tags)
                .push_bind(article.published_at)
                .push_bind(&article.summary)
                .push_bind(&article.image_url);
        });
        builder.push(
            " ON CONFLICT (url) DO UPDATE SET \
               guid = EXCLUDED.guid, \
               title = EXCLUDED.title, \
               source_name = EXCLUDED.source_name, \
               orientation = EXCLUDED.orientation, \
               tags = EXCLUDED.tags, \
               published_at = EXCLUDED.published_at, \
               summary = EXCLUDED.summary, \
               image_url = EXCLUDED.image_url, \
               updated_at = NOW()",
        );

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE published_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_by_url(&self, url: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE url = $1")
            .bind(url)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
