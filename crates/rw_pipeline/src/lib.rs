use chrono::Utc;
use rw_core::{
    live_view, validate, AppConfig, ArticleRecord, Classifier, NewsSource, RemoteStore, Result,
    VersionToken,
};
use rw_storage::ArchiveStore;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// States of a single publish run. Terminal states are `Done` and `Aborted`;
/// every error path logs the last state reached before aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    ArchiveDownloaded,
    NewsFetched,
    Classified,
    Merged,
    LiveProjected,
    Published,
    Done,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::ArchiveDownloaded => "ARCHIVE_DOWNLOADED",
            Self::NewsFetched => "NEWS_FETCHED",
            Self::Classified => "CLASSIFIED",
            Self::Merged => "MERGED",
            Self::LiveProjected => "LIVE_PROJECTED",
            Self::Published => "PUBLISHED",
            Self::Done => "DONE",
            Self::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// How a completed (non-aborted) run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both artifacts were written to the remote store.
    Published {
        inserted: usize,
        archive_len: usize,
        live_len: usize,
    },
    /// The news source returned nothing; no-op run, nothing written.
    NoArticles,
    /// Everything fetched was irrelevant or already archived; publishing is
    /// skipped to avoid a needless version bump.
    NothingNew,
}

/// Pipeline settings carved out of [`AppConfig`] (the pipeline never sees
/// credentials; those stay with the collaborator clients).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub archive_path: String,
    pub live_view_path: String,
    pub live_view_limit: usize,
}

impl PipelineConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            archive_path: config.archive_path.clone(),
            live_view_path: config.live_view_path.clone(),
            live_view_limit: config.live_view_limit,
        }
    }
}

/// Remote snapshot taken at the start of a run: the local scratch copy of the
/// archive plus the version tokens both artifacts had at download time.
struct Snapshot {
    workdir: tempfile::TempDir,
    local_db: PathBuf,
    archive_version: Option<VersionToken>,
    live_version: Option<VersionToken>,
}

/// The publish coordinator. One call to [`Pipeline::run`] performs a full
/// fetch → classify → merge → project → publish sequence against a freshly
/// downloaded copy of the archive; the copy is discarded when the run ends,
/// whatever the outcome.
pub struct Pipeline {
    news: Arc<dyn NewsSource>,
    classifier: Arc<dyn Classifier>,
    remote: Arc<dyn RemoteStore>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        news: Arc<dyn NewsSource>,
        classifier: Arc<dyn Classifier>,
        remote: Arc<dyn RemoteStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            news,
            classifier,
            remote,
            config,
        }
    }

    /// Run the full pipeline once.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut state = RunState::Start;
        match self.run_inner(&mut state).await {
            Ok(outcome) => {
                info!("✅ Run finished in state {}: {:?}", RunState::Done, outcome);
                Ok(outcome)
            }
            Err(e) => {
                error!("💥 Run aborted after reaching state {}: {}", state, e);
                Err(e)
            }
        }
    }

    async fn run_inner(&self, state: &mut RunState) -> Result<RunOutcome> {
        let snapshot = self.download_snapshot().await?;
        *state = RunState::ArchiveDownloaded;

        let raw = self.news.fetch().await?;
        *state = RunState::NewsFetched;
        if raw.is_empty() {
            info!("📭 News source returned no articles, nothing to do");
            return Ok(RunOutcome::NoArticles);
        }

        let drafts = self.classifier.classify(&raw).await?;
        *state = RunState::Classified;

        let records = validate::validate_batch(drafts)?;
        self.merge_and_publish(state, snapshot, &records).await
    }

    /// Bulk-import pre-classified records (a legacy JSON export) through the
    /// same merge and publish path as a normal run.
    pub async fn seed(&self, records: &[ArticleRecord]) -> Result<RunOutcome> {
        let mut state = RunState::Start;
        let snapshot = match self.download_snapshot().await {
            Ok(s) => s,
            Err(e) => {
                error!("💥 Seed aborted after reaching state {}: {}", state, e);
                return Err(e);
            }
        };
        state = RunState::ArchiveDownloaded;

        match self.merge_and_publish(&mut state, snapshot, records).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("💥 Seed aborted after reaching state {}: {}", state, e);
                Err(e)
            }
        }
    }

    /// Pull both remote artifacts. A missing archive blob means first-run
    /// bootstrap: start from an empty local store, publish without a prior
    /// version token.
    async fn download_snapshot(&self) -> Result<Snapshot> {
        let workdir = tempfile::tempdir()?;
        let local_db = workdir.path().join("archive.db");

        let archive_blob = self.remote.get(&self.config.archive_path).await?;
        let live_blob = self.remote.get(&self.config.live_view_path).await?;

        let archive_version = match archive_blob {
            Some(blob) => {
                std::fs::write(&local_db, &blob.content)?;
                info!("⬇️  Downloaded archive ({} bytes)", blob.content.len());
                Some(blob.version)
            }
            None => {
                info!("🌱 No remote archive found, bootstrapping a fresh one");
                None
            }
        };

        Ok(Snapshot {
            workdir,
            local_db,
            archive_version,
            live_version: live_blob.map(|b| b.version),
        })
    }

    async fn merge_and_publish(
        &self,
        state: &mut RunState,
        snapshot: Snapshot,
        records: &[ArticleRecord],
    ) -> Result<RunOutcome> {
        let store = ArchiveStore::open(&snapshot.local_db).await?;
        let inserted = store.merge(records).await?;
        *state = RunState::Merged;

        if inserted == 0 {
            info!("📭 No new records after merge, skipping publish");
            store.close().await;
            return Ok(RunOutcome::NothingNew);
        }

        let archive = store.all_records().await?;
        let live = live_view::project(&archive, self.config.live_view_limit);
        *state = RunState::LiveProjected;

        let db_path = store.close().await;
        let archive_bytes = std::fs::read(&db_path)?;
        let live_bytes = serde_json::to_vec_pretty(&live)?;

        let message = format!(
            "Automated risk update: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );
        self.remote
            .put(
                &self.config.archive_path,
                &archive_bytes,
                &message,
                snapshot.archive_version.as_ref(),
            )
            .await?;
        self.remote
            .put(
                &self.config.live_view_path,
                &live_bytes,
                &message,
                snapshot.live_version.as_ref(),
            )
            .await?;
        *state = RunState::Published;

        // Scratch copy is dropped here regardless of outcome.
        drop(snapshot.workdir);

        Ok(RunOutcome::Published {
            inserted,
            archive_len: archive.len(),
            live_len: live.len(),
        })
    }
}
