// ABOUTME: Error type for store actions

use milemap_auth::AuthError;
use milemap_storage::StorageError;
use thiserror::Error;

/// Failures are terminal at the store boundary: recorded as user-facing
/// text in the error slot and returned, never retried.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
