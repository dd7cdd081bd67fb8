pub mod client;
pub mod errors;
pub mod types;

pub use client::fetch_feed;
pub use errors::FetchError;
pub use types::RawEntry;
