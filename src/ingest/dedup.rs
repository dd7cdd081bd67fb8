//! Intra-run deduplication. Cross-run uniqueness is the store's
//! upsert-on-conflict(url) job, not this module's.

use std::collections::HashSet;

use crate::entities::Article;

/// Retain the first occurrence per distinct url, stable with respect to
/// input order. When `by_guid` is set, a repeated non-empty guid is also a
/// duplicate even under a different url, which defends against feeds that
/// rotate tracking parameters in their links.
pub fn dedup(articles: Vec<Article>, by_guid: bool) -> Vec<Article> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_guids: HashSet<String> = HashSet::new();

    articles
        .into_iter()
        .filter(|article| {
            if !seen_urls.insert(article.url.clone()) {
                return false;
            }
            if by_guid {
                if let Some(guid) = article.guid.as_deref() {
                    if !guid.is_empty() && !seen_guids.insert(guid.to_string()) {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}
