//! Feed registry: the externally loaded list of feed descriptors plus the
//! keyword blocklists, replacing the hardcoded source tables the old
//! deployments each carried their own copy of.
//!
//! The registry is a collaborator injected into the orchestrator. A load
//! failure is a precondition failure for the whole run, not a per-feed one.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Orientation;

/// One feed source. Created at configuration time, never mutated by the
/// pipeline; deactivation means flipping `active` in the registry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDescriptor {
    /// Display name, not guaranteed unique.
    pub name: String,
    /// Fetch endpoint, unique per feed.
    pub url: String,
    pub orientation: Orientation,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// On-disk shape of the registry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    pub feeds: Vec<FeedDescriptor>,
    /// Keywords that exclude an article from any source when its title
    /// contains them (case-insensitive). Horoscopes, crosswords and the like.
    #[serde(default)]
    pub blocklist: Vec<String>,
    /// Additional per-source blocklists, keyed by feed name.
    #[serde(default)]
    pub per_source_blocklist: HashMap<String, Vec<String>>,
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry file {path} contains no active feeds")]
    Empty { path: String },
}

/// Source of feed descriptors and blocklists for a run.
#[cfg_attr(test, mockall::automock)]
pub trait FeedRegistry: Send + Sync {
    fn load(&self) -> Result<RegistryFile, RegistryError>;
}

/// JSON-file-backed registry, the default deployment shape.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedRegistry for FileRegistry {
    fn load(&self) -> Result<RegistryFile, RegistryError> {
        let path = self.path.display().to_string();
        let raw = std::fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: path.clone(),
            source,
        })?;
        let mut file: RegistryFile =
            serde_json::from_str(&raw).map_err(|source| RegistryError::Parse {
                path: path.clone(),
                source,
            })?;
        file.feeds.retain(|feed| feed.active);
        if file.feeds.is_empty() {
            return Err(RegistryError::Empty { path });
        }
        Ok(file)
    }
}

impl RegistryFile {
    /// Blocked keywords applying to an article from the named source:
    /// the global list plus that source's own list.
    pub fn blocked_keywords_for<'a>(&'a self, source_name: &str) -> Vec<&'a str> {
        let mut keywords: Vec<&str> = self.blocklist.iter().map(String::as_str).collect();
        if let Some(extra) = self.per_source_blocklist.get(source_name) {
            keywords.extend(extra.iter().map(String::as_str));
        }
        keywords
    }
}
