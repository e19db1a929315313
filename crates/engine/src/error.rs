use shiftplan_core::CoreError;
use shiftplan_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("stored checksum does not match payload")]
    ChecksumMismatch,

    #[error("unsupported stored format version: {0}")]
    UnsupportedVersion(u32),

    #[error("stored history is empty")]
    EmptyHistory,

    #[error("no preference at index {0}")]
    PreferenceNotFound(usize),

    #[error("config error: {0}")]
    Config(String),
}
