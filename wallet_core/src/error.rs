use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key error: {0}")]
    Key(String),

    #[error("no keystore entry named {0:?}")]
    UnknownEntry(String),

    #[error("keystore entry {0:?} already exists")]
    DuplicateEntry(String),

    #[error("keystore I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keystore serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
