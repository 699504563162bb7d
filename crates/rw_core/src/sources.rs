use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::record::ClassifiedDraft;
use crate::Result;

/// An article as the news source delivers it, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub country: Option<String>,
}

/// Opaque revision identifier for a remote artifact (the blob sha for the
/// GitHub backend). Writes pass the token captured at download time so a
/// concurrent change fails closed instead of being overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(pub String);

/// A remote artifact together with the version it was read at.
#[derive(Debug, Clone)]
pub struct RemoteBlob {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the current batch of raw articles. An empty batch is not an
    /// error; transport and non-2xx failures are.
    async fn fetch(&self) -> Result<Vec<RawArticle>>;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a raw batch into schema-conformant drafts.
    ///
    /// Output that does not parse as a draft sequence must surface as
    /// [`crate::Error::MalformedOutput`] carrying the raw model text; callers
    /// abort the run rather than commit a partial batch.
    async fn classify(&self, articles: &[RawArticle]) -> Result<Vec<ClassifiedDraft>>;
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read a blob and its version token. `None` when the path does not exist.
    async fn get(&self, path: &str) -> Result<Option<RemoteBlob>>;

    /// Write a blob, replacing revision `expected` (or creating the path when
    /// `None`). Returns the new version. A mismatch between `expected` and the
    /// remote's current revision must fail with
    /// [`crate::Error::VersionConflict`], never overwrite.
    async fn put(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected: Option<&VersionToken>,
    ) -> Result<VersionToken>;
}
