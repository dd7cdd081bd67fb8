use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::config::Config;
use crate::registry::{FeedRegistry, FileRegistry};
use crate::repositories::{ArticleStore, PgArticleStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub registry: Arc<dyn FeedRegistry>,
    pub config: Arc<Config>,
    pub db_pool: Pool<Postgres>,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, config: Config) -> Self {
        Self {
            store: Arc::new(PgArticleStore::new(pool.clone())),
            registry: Arc::new(FileRegistry::new(config.feeds_path())),
            config: Arc::new(config),
            db_pool: pool,
        }
    }
}
