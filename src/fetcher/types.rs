use chrono::{DateTime, Utc};
use feed_rs::model::Entry;

/// One item as delivered by a feed, before normalization. Transient; the
/// normalizer consumes these immediately and nothing persists them.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Feed-provided identifier, when the feed sets one.
    pub guid: Option<String>,
    /// Publish instant as resolved by the parser across the various source
    /// fields (ISO dates, RFC-822 pubDate, updated). None when absent or
    /// unparseable; the normalizer substitutes "now" downstream.
    pub published: Option<DateTime<Utc>>,
    /// Pre-stripped snippet field, preferred summary source.
    pub summary_html: Option<String>,
    /// Full content body, second summary source.
    pub content_html: Option<String>,
    /// Image from the entry's media/enclosure objects.
    pub enclosure_url: Option<String>,
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        let link = entry.links.first().map(|l| l.href.clone());
        let guid = if entry.id.trim().is_empty() {
            None
        } else {
            Some(entry.id.clone())
        };
        let enclosure_url = entry
            .media
            .iter()
            .find_map(|media| {
                media
                    .content
                    .iter()
                    .find_map(|content| content.url.as_ref().map(|u| u.to_string()))
                    .or_else(|| {
                        media
                            .thumbnails
                            .first()
                            .map(|thumb| thumb.image.uri.clone())
                    })
            })
            .filter(|u| !u.is_empty());

        Self {
            title: entry.title.map(|t| t.content),
            link,
            guid,
            published: entry.published.or(entry.updated),
            summary_html: entry.summary.map(|s| s.content),
            content_html: entry.content.and_then(|c| c.body),
            enclosure_url,
        }
    }
}
