// ABOUTME: Storage error taxonomy shared by every RemoteStore backend

use std::fmt;
use thiserror::Error;

/// The logical collections of the remote store, named by their table names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Items,
    Departments,
    Owners,
    Feedback,
    AnalysisLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Items => "roadmap_items",
            Collection::Departments => "departments",
            Collection::Owners => "owners",
            Collection::Feedback => "feedback",
            Collection::AnalysisLogs => "analysis_logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("collection {0} is not provisioned")]
    CollectionMissing(Collection),

    #[error("no row in {collection} with key {id}")]
    RowMissing { collection: Collection, id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unauthorized")]
    Unauthorized,
}

pub type StorageResult<T> = Result<T, StorageError>;
