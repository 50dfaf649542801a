// ABOUTME: Session and user types shared by every auth provider

use serde::{Deserialize, Serialize};

/// The authenticated principal as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// A live session: who is signed in and the bearer token proving it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
}

/// Session transitions, broadcast by providers as they happen.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}
