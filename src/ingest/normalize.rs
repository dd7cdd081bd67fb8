//! Per-entry normalization: raw feed item + its descriptor in, canonical
//! article candidate out.
//!
//! The six historical pipeline copies disagreed on field precedence and date
//! handling; this module is the single authoritative version. A missing or
//! garbled date never drops an entry here, it falls back to "now" and the
//! recency filter sees a fresh article by construction.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::entities::Article;
use crate::fetcher::RawEntry;
use crate::registry::FeedDescriptor;

/// Maximum summary length in characters, before the appended ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 180;

const UNTITLED: &str = "(untitled)";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NUMERIC_ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x?[0-9a-fA-F]{1,6});").unwrap());

/// Named entities seen in the wild across the ingested feeds. `&amp;` is
/// decoded last so `&amp;lt;` does not turn into `<`.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&laquo;", "\u{00AB}"),
    ("&raquo;", "\u{00BB}"),
    ("&nbsp;", " "),
    ("&hellip;", "..."),
    ("&eacute;", "é"),
    ("&egrave;", "è"),
    ("&ecirc;", "ê"),
    ("&euml;", "ë"),
    ("&agrave;", "à"),
    ("&acirc;", "â"),
    ("&ucirc;", "û"),
    ("&ugrave;", "ù"),
    ("&ocirc;", "ô"),
    ("&icirc;", "î"),
    ("&iuml;", "ï"),
    ("&ccedil;", "ç"),
    ("&oelig;", "œ"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Map one raw entry into an article candidate.
///
/// Returns `None` only when the entry has neither link nor guid: such an
/// entry has no identity and is not representable, so it is excluded rather
/// than defaulted.
pub fn normalize(entry: &RawEntry, feed: &FeedDescriptor, now: DateTime<Utc>) -> Option<Article> {
    let url = entry
        .link
        .as_deref()
        .filter(|link| !link.trim().is_empty())
        .or(entry.guid.as_deref())?
        .trim()
        .to_string();

    let title = match entry.title.as_deref() {
        Some(raw) if !raw.trim().is_empty() => clean_text(raw),
        _ => UNTITLED.to_string(),
    };

    let summary_source = entry
        .summary_html
        .as_deref()
        .or(entry.content_html.as_deref())
        .unwrap_or(&title);
    let summary = clean_summary(summary_source);

    Some(Article {
        title,
        url,
        guid: entry.guid.clone(),
        source_name: feed.name.clone(),
        orientation: feed.orientation,
        tags: feed.tags.clone(),
        published_at: resolve_published(entry.published, now),
        summary,
        image_url: entry.enclosure_url.clone(),
    })
}

/// Resolve the publish instant: the parsed value when it exists and is not in
/// the future, otherwise "now". Deterministic; never drops the entry.
pub fn resolve_published(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match published {
        Some(instant) if instant <= now => instant,
        _ => now,
    }
}

/// Strip markup, decode entities and collapse whitespace without truncating.
/// Used for titles.
pub fn clean_text(raw: &str) -> String {
    let stripped = TAG_REGEX.replace_all(raw, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE_REGEX.replace_all(&decoded, " ").trim().to_string()
}

/// Full summary treatment: `clean_text` plus the 180-character cap. Entities
/// are decoded before the cut, so truncation can never land mid-entity.
pub fn clean_summary(raw: &str) -> String {
    let cleaned = clean_text(raw);
    truncate_chars(&cleaned, SUMMARY_MAX_CHARS)
}

fn decode_entities(text: &str) -> String {
    let mut decoded = NUMERIC_ENTITY_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            let body = &caps[1];
            let parsed = if let Some(hex) = body.strip_prefix('x') {
                u32::from_str_radix(hex, 16)
            } else {
                body.parse::<u32>()
            };
            match parsed.ok().and_then(char::from_u32) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned();

    for (entity, replacement) in NAMED_ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded
}

/// Cut at a char boundary after `max_chars` characters, appending `...` when
/// anything was cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}
