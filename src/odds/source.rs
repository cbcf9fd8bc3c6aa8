//! The odds source contract and a file-backed implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::types::OddsSnapshot;
use crate::error::SourceError;

/// Produces one [`OddsSnapshot`] per call.
///
/// A failed fetch means the cycle yields zero opportunities; callers must
/// not treat it as fatal.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch the current odds.
    async fn fetch(&self) -> Result<OddsSnapshot, SourceError>;
}

/// Replays a serialized snapshot from disk.
#[derive(Debug, Clone)]
pub struct FileOddsSource {
    path: PathBuf,
}

impl FileOddsSource {
    /// Create a source reading the given JSON file on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OddsSource for FileOddsSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<OddsSnapshot, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let snapshot: Option<OddsSnapshot> = serde_json::from_str(&raw)
            .map_err(|e| SourceError::MalformedResponse(format!("{}: {}", self.path.display(), e)))?;

        let snapshot = snapshot.ok_or_else(|| {
            SourceError::MalformedResponse(format!("{}: snapshot is null", self.path.display()))
        })?;

        debug!(matches = snapshot.len(), "Loaded snapshot from file");
        Ok(snapshot)
    }
}
