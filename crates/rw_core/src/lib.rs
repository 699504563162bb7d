pub mod config;
pub mod error;
pub mod live_view;
pub mod record;
pub mod sources;
pub mod validate;

pub use config::AppConfig;
pub use error::Error;
pub use record::{ArticleRecord, ArticleType, ClassifiedDraft, DraftCategory, DraftType, RiskCategory};
pub use sources::{Classifier, NewsSource, RawArticle, RemoteBlob, RemoteStore, VersionToken};

pub type Result<T> = std::result::Result<T, Error>;
