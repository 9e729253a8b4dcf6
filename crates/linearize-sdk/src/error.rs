use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("diff error: {0}")]
    Diff(#[from] linearize_diff::DiffError),

    #[error("merge error: {0}")]
    Merge(#[from] linearize_merge::MergeError),

    #[error("adapter error: {0}")]
    Adapter(#[from] linearize_object::AdapterError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
