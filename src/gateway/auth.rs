use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn,
    TokenRefreshed,
    UserUpdated,
    SignedOut,
}

/// Session-change notification: what happened and the session after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub change: AuthChange,
    pub session: Option<Session>,
}

impl AuthEvent {
    /// True when the event leaves no usable session.
    pub fn ends_session(&self) -> bool {
        self.change == AuthChange::SignedOut || self.session.is_none()
    }
}

/// Listener handle returned by [`AuthGateway::on_auth_state_change`].
/// Dropping it unsubscribes.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    pub fn new(receiver: broadcast::Receiver<AuthEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event; `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>>;

    async fn get_user(&self) -> Result<Option<AuthUser>>;

    async fn sign_out(&self) -> Result<()>;

    fn on_auth_state_change(&self) -> AuthSubscription;
}

const EVENT_CAPACITY: usize = 16;

/// Session holder used by the CLI and tests. It does not authenticate
/// anyone: it is handed an identity and reports session changes.
pub struct LocalAuth {
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for LocalAuth {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Mutex::new(None),
            events,
        }
    }
}

impl LocalAuth {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        let auth = Self::default();
        *auth.session() = Some(Session {
            user,
            expires_at: None,
        });
        auth
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, change: AuthChange, session: Option<Session>) {
        // No listeners is fine.
        let _ = self.events.send(AuthEvent { change, session });
    }

    pub fn sign_in(&self, user: AuthUser) -> Session {
        let session = Session {
            user,
            expires_at: None,
        };
        *self.session() = Some(session.clone());
        self.emit(AuthChange::SignedIn, Some(session.clone()));
        session
    }

    /// Replace the signed-in identity, as a token refresh would.
    pub fn refresh(&self, user: AuthUser) {
        let session = Session {
            user,
            expires_at: None,
        };
        *self.session() = Some(session.clone());
        self.emit(AuthChange::TokenRefreshed, Some(session));
    }

    /// Drop the session without an explicit sign-out; a failed refresh
    /// reports no session.
    pub fn expire(&self) {
        *self.session() = None;
        self.emit(AuthChange::TokenRefreshed, None);
    }

    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl AuthGateway for LocalAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.session().clone())
    }

    async fn get_user(&self) -> Result<Option<AuthUser>> {
        Ok(self.session().as_ref().map(|s| s.user.clone()))
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session() = None;
        self.emit(AuthChange::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        AuthSubscription::new(self.events.subscribe())
    }
}
