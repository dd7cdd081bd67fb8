pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod entities;
pub mod fetcher;
pub mod health;
pub mod ingest;
pub mod registry;
pub mod repositories;
