pub mod articles;

pub use articles::{ArticleStore, PgArticleStore};

#[cfg(test)]
pub use articles::MockArticleStore;
