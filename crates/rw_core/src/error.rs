use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("News source error: {0}")]
    News(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Classifier returned malformed output: {reason}\nraw output: {raw}")]
    MalformedOutput { reason: String, raw: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Version conflict on {path}: remote changed since download")]
    VersionConflict { path: String },

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}
