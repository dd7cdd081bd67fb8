use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Political-leaning tag attached to every feed, carried onto its articles.
/// Closed vocabulary; stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Left,
    CenterLeft,
    Center,
    CenterRight,
    Right,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Left => "left",
            Orientation::CenterLeft => "center-left",
            Orientation::Center => "center",
            Orientation::CenterRight => "center-right",
            Orientation::Right => "right",
        }
    }
}

/// Canonical, persisted representation of one news item.
///
/// `url` is the unique key in storage; repeat sightings overwrite the row via
/// upsert-on-conflict rather than appending. `guid` is the feed-provided
/// identifier, kept for intra-run dedup and stored for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub guid: Option<String>,
    pub source_name: String,
    pub orientation: Orientation,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    pub image_url: Option<String>,
}
