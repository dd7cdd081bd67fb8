use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tracing::instrument;

use crate::fetcher::{errors::FetchError, types::RawEntry};
use crate::registry::FeedDescriptor;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "NewswireBot/0.1 (+https://newswire.example.com)";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                "application/rss+xml,application/atom+xml,application/xml;q=0.9,*/*;q=0.8"
                    .parse()
                    .unwrap(),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Fetch one feed and parse it into raw entries.
///
/// `timeout` bounds the whole request; hitting it yields a timeout-classed
/// `FetchError` so the orchestrator can tag the feed `timeout` rather than
/// `error`. Any failure returns an empty contribution upstream; nothing here
/// aborts a run.
#[instrument(skip_all, fields(feed = %feed.name, url = %feed.url))]
pub async fn fetch_feed(feed: &FeedDescriptor, timeout: Duration) -> Result<Vec<RawEntry>, FetchError> {
    let parsed_url = url::Url::parse(&feed.url)?;

    let response = HTTP_CLIENT
        .get(parsed_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length() {
        if content_length > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(content_length));
        }
    }

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                FetchError::RequestTimeout
            } else {
                FetchError::Io(e.to_string())
            }
        })?;

    // Check body size after download (in case Content-Length was missing)
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    let parsed = feed_rs::parser::parse(&body_bytes[..])?;
    Ok(parsed.entries.into_iter().map(RawEntry::from).collect())
}
