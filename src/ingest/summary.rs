use serde::Serialize;
use utoipa::ToSchema;

/// Outcome tag for one feed within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedOutcome {
    Ok,
    Timeout,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedReport {
    pub name: String,
    pub outcome: FeedOutcome,
    pub entries: u64,
}

/// Transient output of one orchestration pass; serialized back to the
/// scheduler and logged, never persisted.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RunSummary {
    pub success: bool,
    pub sources_ok: u32,
    pub sources_timeout: u32,
    pub sources_error: u32,
    pub articles_found: u64,
    pub articles_filtered: u64,
    pub articles_inserted: u64,
    pub articles_deleted: u64,
    pub duration_ms: u64,
    pub feeds: Vec<FeedReport>,
}

impl RunSummary {
    /// `sources_ok + sources_timeout + sources_error`, which must equal the
    /// number of feeds attempted.
    pub fn sources_total(&self) -> u32 {
        self.sources_ok + self.sources_timeout + self.sources_error
    }
}
