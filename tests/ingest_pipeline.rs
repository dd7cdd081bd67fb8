mod helpers;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use helpers::MemoryStore;
use newswire::config::IngestConfig;
use newswire::entities::Orientation;
use newswire::ingest::{run_ingestion, FeedOutcome};
use newswire::registry::{FileRegistry, RegistryError};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn rss_body(items: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>Test Feed</title>
<link>https://news.example.com</link>
{items}
</channel></rss>"#
    )
}

fn write_registry(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("newswire-feeds-{}.json", uuid_suffix()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn uuid_suffix() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn test_config() -> IngestConfig {
    IngestConfig {
        recency_window_hours: 48,
        retention_hours: 48,
        fetch_timeout_secs: 1,
        fetch_batch_size: 5,
        upsert_batch_size: 100,
        dedup_by_guid: true,
    }
}

/// One full pass: feed A carries a url-duplicate pair, a blocklisted title,
/// a stale item and a date-less item; feed B never answers in time.
#[tokio::test]
async fn end_to_end_run_with_dedup_filtering_and_timeout() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    let fresh = (Utc::now() - ChronoDuration::hours(1)).to_rfc2822();
    let stale = (Utc::now() - ChronoDuration::hours(72)).to_rfc2822();

    let body = rss_body(&format!(
        r#"<item>
             <title>Premier</title>
             <link>https://news.example.com/1</link>
             <guid>guid-1</guid>
             <pubDate>{fresh}</pubDate>
             <description>Les d&#233;tails</description>
           </item>
           <item>
             <title>Second</title>
             <link>https://news.example.com/1</link>
             <guid>guid-2</guid>
             <pubDate>{fresh}</pubDate>
           </item>
           <item>
             <title>Votre horoscope du jour</title>
             <link>https://news.example.com/horoscope</link>
             <pubDate>{fresh}</pubDate>
           </item>
           <item>
             <title>Vieille nouvelle</title>
             <link>https://news.example.com/vieille</link>
             <pubDate>{stale}</pubDate>
           </item>
           <item>
             <title>Sans date</title>
             <link>https://news.example.com/sans-date</link>
             <pubDate>not-a-date</pubDate>
           </item>"#
    ));

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.into_bytes())
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(&server_a)
        .await;

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(rss_body("").into_bytes())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server_b)
        .await;

    let registry_path = write_registry(&format!(
        r#"{{
            "feeds": [
                {{"name": "Feed A", "url": "{}/rss", "orientation": "center-left", "tags": ["general"]}},
                {{"name": "Feed B", "url": "{}/rss", "orientation": "right", "tags": ["general"]}}
            ],
            "blocklist": ["horoscope"]
        }}"#,
        server_a.uri(),
        server_b.uri()
    ));
    let registry = FileRegistry::new(&registry_path);
    let store = MemoryStore::new();

    let summary = run_ingestion(&registry, &store, &test_config())
        .await
        .unwrap();

    assert!(summary.success);
    assert_eq!(summary.sources_ok, 1);
    assert_eq!(summary.sources_timeout, 1);
    assert_eq!(summary.sources_error, 0);
    assert_eq!(summary.sources_total(), 2);
    assert_eq!(summary.articles_found, 5);
    assert_eq!(summary.articles_filtered, 1);
    // url-dup collapsed, horoscope blocked, stale excluded: two rows written
    assert_eq!(summary.articles_inserted, 2);
    assert!(summary.articles_inserted <= summary.articles_found);
    assert_eq!(store.len(), 2);

    // first-seen wins for the duplicated url
    let winner = store.get("https://news.example.com/1").unwrap();
    assert_eq!(winner.title, "Premier");
    assert_eq!(winner.guid.as_deref(), Some("guid-1"));
    assert_eq!(winner.source_name, "Feed A");
    assert_eq!(winner.orientation, Orientation::CenterLeft);

    // the date-less item fell back to "now" and survived the recency filter
    let dateless = store.get("https://news.example.com/sans-date").unwrap();
    assert!((Utc::now() - dateless.published_at).num_seconds().abs() < 5);

    // per-feed reports carry the outcome tags
    let outcome_of = |name: &str| {
        summary
            .feeds
            .iter()
            .find(|f| f.name == name)
            .unwrap()
            .outcome
    };
    assert_eq!(outcome_of("Feed A"), FeedOutcome::Ok);
    assert_eq!(outcome_of("Feed B"), FeedOutcome::Timeout);

    std::fs::remove_file(registry_path).ok();
}

/// Running twice over an unchanged feed set converges: the second run
/// overwrites rather than duplicates.
#[tokio::test]
async fn reingestion_is_idempotent() {
    let server = MockServer::start().await;
    let fresh = (Utc::now() - ChronoDuration::hours(1)).to_rfc2822();

    let body = rss_body(&format!(
        r#"<item>
             <title>Stable</title>
             <link>https://news.example.com/stable</link>
             <pubDate>{fresh}</pubDate>
           </item>"#
    ));

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into_bytes()))
        .mount(&server)
        .await;

    let registry_path = write_registry(&format!(
        r#"{{"feeds": [{{"name": "Feed", "url": "{}/rss", "orientation": "center"}}]}}"#,
        server.uri()
    ));
    let registry = FileRegistry::new(&registry_path);
    let store = MemoryStore::new();
    let config = test_config();

    let first = run_ingestion(&registry, &store, &config).await.unwrap();
    let second = run_ingestion(&registry, &store, &config).await.unwrap();

    assert_eq!(first.articles_inserted, 1);
    assert_eq!(second.articles_inserted, 1);
    assert_eq!(store.len(), 1);
    assert!(store.get("https://news.example.com/stable").is_some());

    std::fs::remove_file(registry_path).ok();
}

/// A rejected batch is logged and skipped; the remaining batches still land,
/// and only acknowledged rows are counted.
#[tokio::test]
async fn failed_batch_does_not_abort_remaining_batches() {
    let server = MockServer::start().await;
    let fresh = (Utc::now() - ChronoDuration::hours(1)).to_rfc2822();

    let body = rss_body(&format!(
        r#"<item><title>Un</title><link>https://news.example.com/1</link><pubDate>{fresh}</pubDate></item>
           <item><title>Deux</title><link>https://news.example.com/2</link><pubDate>{fresh}</pubDate></item>
           <item><title>Trois</title><link>https://news.example.com/3</link><pubDate>{fresh}</pubDate></item>"#
    ));

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into_bytes()))
        .mount(&server)
        .await;

    let registry_path = write_registry(&format!(
        r#"{{"feeds": [{{"name": "Feed", "url": "{}/rss", "orientation": "center"}}]}}"#,
        server.uri()
    ));
    let registry = FileRegistry::new(&registry_path);
    let store = MemoryStore::new();
    store.fail_next_upsert();

    let mut config = test_config();
    config.upsert_batch_size = 1; // three batches, first one rejected

    let summary = run_ingestion(&registry, &store, &config).await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.articles_found, 3);
    assert_eq!(summary.articles_inserted, 2);
    assert_eq!(store.len(), 2);

    std::fs::remove_file(registry_path).ok();
}

/// The retention sweep removes aged rows even when the run inserts nothing.
#[tokio::test]
async fn retention_sweep_runs_independently_of_inserts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(rss_body("").into_bytes()))
        .mount(&server)
        .await;

    let registry_path = write_registry(&format!(
        r#"{{"feeds": [{{"name": "Feed", "url": "{}/rss", "orientation": "center"}}]}}"#,
        server.uri()
    ));
    let registry = FileRegistry::new(&registry_path);

    let store = MemoryStore::new();
    store.insert(newswire::entities::Article {
        title: "Antique".to_string(),
        url: "https://news.example.com/antique".to_string(),
        guid: None,
        source_name: "Feed".to_string(),
        orientation: Orientation::Center,
        tags: vec![],
        published_at: Utc::now() - ChronoDuration::hours(100),
        summary: String::new(),
        image_url: None,
    });

    let summary = run_ingestion(&registry, &store, &test_config())
        .await
        .unwrap();

    assert_eq!(summary.articles_inserted, 0);
    assert_eq!(summary.articles_deleted, 1);
    assert_eq!(store.len(), 0);

    std::fs::remove_file(registry_path).ok();
}

/// A missing registry is a precondition failure: the error escapes and no
/// partial run happens.
#[tokio::test]
async fn missing_registry_fails_the_run_before_fetching() {
    let registry = FileRegistry::new("/definitely/not/here/feeds.json");
    let store = MemoryStore::new();

    let err = run_ingestion(&registry, &store, &test_config())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Io { .. }));
    assert_eq!(store.len(), 0);
}
