// ABOUTME: The AuthProvider trait: session retrieval, password sign-in, sign-out, events

use crate::error::AuthResult;
use crate::types::{AuthEvent, Session};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Seam between the application and whichever identity service backs it.
///
/// Providers own session persistence and refresh; callers only observe
/// sessions and the `SignedIn`/`SignedOut` transitions on the event stream.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session restored from whatever the provider persisted, if any.
    async fn current_session(&self) -> AuthResult<Option<Session>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// Events start flowing from the moment of subscription; earlier
    /// transitions are not replayed.
    fn events(&self) -> broadcast::Receiver<AuthEvent>;
}
