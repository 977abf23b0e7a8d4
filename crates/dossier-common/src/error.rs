//! Error types for Dossier.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DossierError {
    #[error("Recency store error: {0}")]
    Memory(String),

    #[error("Graph store error: {0}")]
    Graph(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DossierError>;
