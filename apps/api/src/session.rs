//! Session Provider — who is signed in, and a feed of changes to that.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    /// Opaque bearer token issued by the provider.
    pub access_token: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No active session")]
    NoSession,

    #[error("Session provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>, SessionError>;

    /// Receives every sign-in and sign-out from now on.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    async fn sign_out(&self) -> Result<(), SessionError>;
}

/// Session held in process, published over a `watch` channel.
pub struct LocalSessionProvider {
    tx: watch::Sender<Option<Session>>,
}

impl LocalSessionProvider {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        info!("Session started for user {}", session.user_id);
        self.tx.send_replace(Some(session));
    }
}

impl Default for LocalSessionProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.tx.borrow().clone())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        if let Some(previous) = self.tx.send_replace(None) {
            info!("Session ended for user {}", previous.user_id);
        }
        Ok(())
    }
}
