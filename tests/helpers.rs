use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use newswire::entities::Article;
use newswire::repositories::ArticleStore;

/// In-memory ArticleStore with upsert-on-url semantics, standing in for
/// Postgres in the pipeline tests.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Article>>,
    fail_next_upsert: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next upsert batch fail, once. Later batches succeed.
    pub fn fail_next_upsert(&self) {
        self.fail_next_upsert.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, url: &str) -> Option<Article> {
        self.rows.lock().unwrap().get(url).cloned()
    }

    pub fn insert(&self, article: Article) {
        self.rows.lock().unwrap().insert(article.url.clone(), article);
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn upsert_batch(&self, articles: &[Article]) -> Result<u64> {
        if self.fail_next_upsert.swap(false, Ordering::SeqCst) {
            bail!("store rejected batch");
        }
        let mut rows = self.rows.lock().unwrap();
        for article in articles {
            rows.insert(article.url.clone(), article.clone());
        }
        Ok(articles.len() as u64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, article| article.published_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn count_by_url(&self, url: &str) -> Result<i64> {
        Ok(self.rows.lock().unwrap().contains_key(url) as i64)
    }
}
