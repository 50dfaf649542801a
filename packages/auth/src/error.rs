// ABOUTME: Error types for authentication operations

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Session expired or invalid")]
    SessionExpired,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Transport(String),
}
