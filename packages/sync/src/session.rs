// ABOUTME: SessionManager: restores an existing session, then follows auth
// ABOUTME: events to load data and start or stop the change-feed consumer

use crate::client::SyncClient;
use milemap_auth::{AuthEvent, AuthProvider, AuthResult, Session};
use milemap_store::RoadmapStore;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Wires the auth provider to the store and sync client.
pub struct SessionManager {
    store: Arc<RoadmapStore>,
    auth: Arc<dyn AuthProvider>,
    sync: Arc<SyncClient>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    pub fn new(
        store: Arc<RoadmapStore>,
        auth: Arc<dyn AuthProvider>,
        sync: Arc<SyncClient>,
    ) -> Self {
        SessionManager {
            store,
            auth,
            sync,
            task: Mutex::new(None),
        }
    }

    /// Restores any persisted session, then follows the provider's event
    /// stream. A failed initial load is already recorded in the store's
    /// error slot, so it does not fail the bootstrap; only the session
    /// lookup itself can.
    pub async fn bootstrap(&self) -> AuthResult<()> {
        match self.auth.current_session().await? {
            Some(session) => {
                info!("restored session for {}", session.user.id);
                open_session(&self.store, &self.sync, session).await;
            }
            None => self.store.set_loading(false),
        }

        let mut events = self.auth.events();
        let store = self.store.clone();
        let sync = self.sync.clone();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SignedIn(session)) => {
                        open_session(&store, &sync, session).await;
                    }
                    Ok(AuthEvent::SignedOut) => {
                        store.set_authenticated(false);
                        store.set_current_user(None);
                        sync.unsubscribe_from_changes().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("auth event stream lagged by {skipped}");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        *self.task.lock().await = Some(handle);
        Ok(())
    }

    /// Stops the auth event loop and the change-feed consumer.
    pub async fn shutdown(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
        }
        self.sync.unsubscribe_from_changes().await;
    }
}

async fn open_session(store: &Arc<RoadmapStore>, sync: &Arc<SyncClient>, session: Session) {
    store.set_authenticated(true);
    store.set_current_user(Some(session.user));
    if let Err(err) = sync.initialize().await {
        warn!("initial load failed: {err}");
    }
    if let Err(err) = sync.subscribe_to_changes().await {
        warn!("change feed unavailable: {err}");
    }
}
