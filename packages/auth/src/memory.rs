// ABOUTME: In-memory AuthProvider with preset credentials, used by session and store tests

use crate::error::{AuthError, AuthResult};
use crate::provider::AuthProvider;
use crate::types::{AuthEvent, AuthUser, Session};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Default)]
struct AuthState {
    credentials: HashMap<String, String>,
    session: Option<Session>,
    fail_sign_out: bool,
}

/// Provider double with deterministic ids and tokens.
pub struct MemoryAuth {
    state: Mutex<AuthState>,
    events: broadcast::Sender<AuthEvent>,
    counter: AtomicU64,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryAuth {
            state: Mutex::new(AuthState::default()),
            events,
            counter: AtomicU64::new(0),
        }
    }

    /// Registers a credential pair accepted by `sign_in_with_password`.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.lock()
            .credentials
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Presets a persisted session, as if the user signed in last run.
    pub fn with_session(self, session: Session) -> Self {
        self.lock().session = Some(session);
        self
    }

    /// The next `sign_out` call fails and leaves the session in place.
    pub fn fail_next_sign_out(&self) {
        self.lock().fail_sign_out = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn current_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.lock().session.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let session = {
            let mut state = self.lock();
            match state.credentials.get(email) {
                Some(stored) if stored == password => {
                    let n = self.next_id();
                    let session = Session {
                        user: AuthUser {
                            id: format!("u-{n}"),
                            email: Some(email.to_string()),
                        },
                        access_token: format!("token-{n}"),
                    };
                    state.session = Some(session.clone());
                    session
                }
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        {
            let mut state = self.lock();
            if state.fail_sign_out {
                state.fail_sign_out = false;
                return Err(AuthError::Provider("sign-out rejected".to_string()));
            }
            state.session = None;
        }
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn password_sign_in_creates_session_and_event() {
        let auth = MemoryAuth::new().with_user("dr@example.com", "hunter2");
        let mut events = auth.events();

        let session = auth
            .sign_in_with_password("dr@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.user.email.as_deref(), Some("dr@example.com"));
        assert_eq!(auth.current_session().await.unwrap(), Some(session.clone()));

        match events.try_recv().unwrap() {
            AuthEvent::SignedIn(s) => assert_eq!(s, session),
            AuthEvent::SignedOut => panic!("expected SignedIn"),
        }
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = MemoryAuth::new().with_user("dr@example.com", "hunter2");

        let err = auth
            .sign_in_with_password("dr@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(auth.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_out_clears_session_and_announces() {
        let auth = MemoryAuth::new().with_user("dr@example.com", "hunter2");
        auth.sign_in_with_password("dr@example.com", "hunter2")
            .await
            .unwrap();
        let mut events = auth.events();

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_session().await.unwrap(), None);
        assert!(matches!(events.try_recv().unwrap(), AuthEvent::SignedOut));
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_the_session() {
        let auth = MemoryAuth::new().with_user("dr@example.com", "hunter2");
        auth.sign_in_with_password("dr@example.com", "hunter2")
            .await
            .unwrap();

        auth.fail_next_sign_out();
        assert!(auth.sign_out().await.is_err());
        assert!(auth.current_session().await.unwrap().is_some());

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_session().await.unwrap(), None);
    }
}
