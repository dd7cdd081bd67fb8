//! The ingestion pipeline: one externally triggered pass over every active
//! feed, producing upserted articles and a run summary.
//!
//! Per invocation the orchestrator moves through fetch (bounded concurrent
//! batches) -> normalize -> filter -> dedup -> persist -> cleanup. No state
//! survives between runs beyond what the store holds; re-ingesting the same
//! item converges onto one row because persistence is an upsert keyed on url.

pub mod dedup;
pub mod filters;
pub mod normalize;
pub mod summary;

pub use summary::{FeedOutcome, FeedReport, RunSummary};

use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::entities::Article;
use crate::fetcher::{fetch_feed, RawEntry};
use crate::registry::{FeedDescriptor, FeedRegistry, RegistryError};
use crate::repositories::ArticleStore;

/// Drive one full ingestion pass.
///
/// Per-feed failures are tagged and counted, never raised; batch-write and
/// cleanup failures are logged per operation and the remaining work still
/// runs. The only error that escapes is the precondition failure of the
/// registry itself not loading, in which case no fetch is attempted.
pub async fn run_ingestion(
    registry: &dyn FeedRegistry,
    store: &dyn ArticleStore,
    config: &IngestConfig,
) -> Result<RunSummary, RegistryError> {
    let started = Instant::now();
    let registry_file = registry.load()?;

    let run_id = Uuid::new_v4();
    let now = Utc::now();
    info!(
        %run_id,
        feeds = registry_file.feeds.len(),
        recency_window_hours = config.recency_window_hours,
        "starting ingestion run"
    );

    let mut summary = RunSummary::default();

    // Fetch in fixed-size groups, each group's feeds concurrently, groups
    // sequentially, to cap simultaneous outbound connections.
    let mut fetched: Vec<(FeedDescriptor, Vec<RawEntry>)> = Vec::new();
    for group in registry_file.feeds.chunks(config.fetch_batch_size.max(1)) {
        let results = futures::future::join_all(
            group
                .iter()
                .map(|feed| async move { (feed, fetch_feed(feed, config.fetch_timeout()).await) }),
        )
        .await;

        for (feed, result) in results {
            match result {
                Ok(entries) => {
                    summary.sources_ok += 1;
                    summary.articles_found += entries.len() as u64;
                    summary.feeds.push(FeedReport {
                        name: feed.name.clone(),
                        outcome: FeedOutcome::Ok,
                        entries: entries.len() as u64,
                    });
                    fetched.push((feed.clone(), entries));
                }
                Err(err) if err.is_timeout() => {
                    warn!(feed = %feed.name, %err, "feed timed out");
                    summary.sources_timeout += 1;
                    summary.feeds.push(FeedReport {
                        name: feed.name.clone(),
                        outcome: FeedOutcome::Timeout,
                        entries: 0,
                    });
                }
                Err(err) => {
                    warn!(feed = %feed.name, %err, "feed failed");
                    summary.sources_error += 1;
                    summary.feeds.push(FeedReport {
                        name: feed.name.clone(),
                        outcome: FeedOutcome::Error,
                        entries: 0,
                    });
                }
            }
        }
    }

    // Normalize and filter in feed-iteration order so first-seen-wins dedup
    // is stable with respect to the registry ordering.
    let mut candidates: Vec<Article> = Vec::new();
    for (feed, entries) in fetched {
        let blocked = registry_file.blocked_keywords_for(&feed.name);
        for entry in entries {
            let Some(article) = normalize::normalize(&entry, &feed, now) else {
                // Entry without link or guid is not representable as an article.
                continue;
            };
            if !filters::is_recent(&article, now, config.recency_window()) {
                continue;
            }
            if filters::is_blocked(&article.title, &blocked) {
                summary.articles_filtered += 1;
                continue;
            }
            candidates.push(article);
        }
    }

    let deduped = dedup::dedup(candidates, config.dedup_by_guid);

    // Persist in bounded batches; one failed batch is logged and skipped so
    // the remaining batches still get their chance. Only acknowledged rows
    // count as inserted.
    for batch in deduped.chunks(config.upsert_batch_size.max(1)) {
        match store.upsert_batch(batch).await {
            Ok(written) => summary.articles_inserted += written,
            Err(err) => {
                error!(%err, batch_len = batch.len(), "article batch upsert failed");
            }
        }
    }

    // Retention sweep runs regardless of insert outcome, and its own failure
    // must not fail the run.
    let cutoff = now - config.retention_horizon();
    match store.delete_older_than(cutoff).await {
        Ok(deleted) => summary.articles_deleted = deleted,
        Err(err) => {
            error!(%err, %cutoff, "retention sweep failed");
        }
    }

    summary.success = true;
    summary.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        %run_id,
        sources_ok = summary.sources_ok,
        sources_timeout = summary.sources_timeout,
        sources_error = summary.sources_error,
        articles_found = summary.articles_found,
        articles_filtered = summary.articles_filtered,
        articles_inserted = summary.articles_inserted,
        articles_deleted = summary.articles_deleted,
        duration_ms = summary.duration_ms,
        "ingestion run finished"
    );
    Ok(summary)
}
