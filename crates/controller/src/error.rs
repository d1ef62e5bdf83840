use crate::config::ConfigError;
use crate::indexer::IndexError;
use crate::metrics::MetricsError;
use seqchain_genesis::GenesisError;
use seqchain_storage::StorageError;

/// Controller errors
#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("metrics registration failed: {0}")]
    Metrics(#[from] MetricsError),
    #[error("config parse failed: {0}")]
    ConfigParse(#[from] ConfigError),
    #[error("genesis parse failed: {0}")]
    GenesisParse(#[from] GenesisError),
    #[error("store initialization failed: {0}")]
    StorageInit(#[source] StorageError),
    #[error("rpc handler construction failed: {0}")]
    Rpc(#[source] serde_json::Error),
    #[error("metadata read failed: {0}")]
    StorageRead(#[source] StorageError),
    #[error("metadata write failed: {0}")]
    StorageWrite(#[source] StorageError),
    #[error("malformed block: {0}")]
    MalformedBlock(String),
}

impl From<IndexError> for ControllerError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Write(source) => ControllerError::StorageWrite(source),
            mismatch @ IndexError::ResultCountMismatch { .. } => {
                ControllerError::MalformedBlock(mismatch.to_string())
            }
        }
    }
}

pub type Result<T, E = ControllerError> = std::result::Result<T, E>;
