// ABOUTME: AuthProvider adapter speaking the hosted identity service under /auth/v1
// ABOUTME: Password grant in, bearer logout out; the live session is cached in memory

use crate::config::CloudConfig;
use async_trait::async_trait;
use milemap_auth::{AuthError, AuthEvent, AuthProvider, AuthResult, AuthUser, Session};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const EVENT_CAPACITY: usize = 16;

/// Token grant response, reduced to the fields the session needs.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// `AuthProvider` over the hosted identity endpoints.
///
/// Signs in with the password grant and keeps the resulting session in
/// process memory; nothing is persisted across runs. Transitions are
/// broadcast so the session manager can drive loads and subscriptions.
pub struct RestAuth {
    http: Client,
    api_url: String,
    api_key: String,
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl RestAuth {
    pub fn new(config: CloudConfig) -> AuthResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(RestAuth {
            http,
            api_url: config.api_url,
            api_key: config.api_key,
            session: Mutex::new(None),
            events,
        })
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AuthProvider for RestAuth {
    async fn current_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.lock_session().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let url = format!("{}/auth/v1/token", self.api_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| AuthError::Transport(e.to_string()))?;
                let token: TokenResponse = serde_json::from_str(&body)
                    .map_err(|e| AuthError::Provider(format!("malformed token response: {e}")))?;
                let session = Session {
                    user: AuthUser {
                        id: token.user.id,
                        email: token.user.email,
                    },
                    access_token: token.access_token,
                };
                *self.lock_session() = Some(session.clone());
                info!("Signed in: user={}", session.user.id);
                let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
                Ok(session)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthError::InvalidCredentials)
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                Err(AuthError::Provider(body))
            }
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let token = self.lock_session().as_ref().map(|s| s.access_token.clone());
        if let Some(token) = token {
            let url = format!("{}/auth/v1/logout", self.api_url);
            let response = self
                .http
                .post(&url)
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;

            let status = response.status();
            // a rejected token is already signed out server-side
            if !status.is_success() && status != StatusCode::UNAUTHORIZED {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                warn!("Sign-out rejected: status={}", status);
                return Err(AuthError::Provider(body));
            }
        }
        *self.lock_session() = None;
        info!("Signed out");
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
