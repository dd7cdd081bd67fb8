//! Recency and keyword filtering, applied after normalization so both see
//! resolved dates and titles.

use chrono::{DateTime, Duration, Utc};

use crate::entities::Article;

/// Whether the article falls inside the recency window. Entries whose dates
/// fell back to "now" during normalization cannot be stale here.
pub fn is_recent(article: &Article, now: DateTime<Utc>, window: Duration) -> bool {
    article.published_at >= now - window
}

/// Case-insensitive containment test of the title against the blocked
/// keywords (global list plus the source's own).
pub fn is_blocked(title: &str, blocked_keywords: &[&str]) -> bool {
    if blocked_keywords.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    blocked_keywords
        .iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .any(|keyword| title.contains(&keyword.to_lowercase()))
}
