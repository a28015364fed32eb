//! Session context and the guard wrapping every admin view.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::error::{CamaraError, Result};
use crate::gateway::{AuthEvent, AuthGateway, AuthSubscription, AuthUser};
use crate::routes::Route;

/// Identity used to stamp authorship. Created on sign-in, invalidated on
/// sign-out or expiry, and handed explicitly to whatever writes records.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Arc<RwLock<Option<AuthUser>>>,
}

impl SessionContext {
    pub fn new(user: AuthUser) -> Self {
        Self {
            user: Arc::new(RwLock::new(Some(user))),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<AuthUser>> {
        self.user.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthUser>> {
        self.user.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn require_user(&self) -> Result<AuthUser> {
        self.current().ok_or(CamaraError::NotAuthenticated)
    }

    pub fn set(&self, user: AuthUser) {
        *self.write() = Some(user);
    }

    pub fn invalidate(&self) {
        *self.write() = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardStatus {
    Authenticated(AuthUser),
    Redirect(Route),
}

/// Mounted for the lifetime of an admin view. Dropping the guard
/// unsubscribes from session changes.
pub struct SessionGuard {
    subscription: AuthSubscription,
    context: SessionContext,
    status: GuardStatus,
}

impl SessionGuard {
    /// Subscribe, then check the current session, so a sign-out racing
    /// the mount is still observed.
    pub async fn mount(auth: &dyn AuthGateway, context: SessionContext) -> Self {
        let subscription = auth.on_auth_state_change();
        let user = match auth.get_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                warn!(error = %e, "Session lookup failed");
                None
            }
        };

        let mut guard = Self {
            subscription,
            context,
            status: GuardStatus::Redirect(Route::Login),
        };
        guard.apply(user);
        guard
    }

    fn apply(&mut self, user: Option<AuthUser>) {
        match user {
            Some(user) => {
                debug!(user = %user.email, "Session active");
                self.context.set(user.clone());
                self.status = GuardStatus::Authenticated(user);
            }
            None => {
                if self.is_authenticated() {
                    info!("Session ended, redirecting to login");
                }
                self.context.invalidate();
                self.status = GuardStatus::Redirect(Route::Login);
            }
        }
    }

    pub fn status(&self) -> &GuardStatus {
        &self.status
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, GuardStatus::Authenticated(_))
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn handle(&mut self, event: &AuthEvent) -> &GuardStatus {
        let user = if event.ends_session() {
            None
        } else {
            event.session.as_ref().map(|s| s.user.clone())
        };
        self.apply(user);
        &self.status
    }

    /// Wait for the next session change. `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<&GuardStatus> {
        let event = self.subscription.next().await?;
        Some(self.handle(&event))
    }

    /// Apply every change delivered so far without waiting.
    pub fn poll(&mut self) -> &GuardStatus {
        while let Some(event) = self.subscription.try_next() {
            self.handle(&event);
        }
        &self.status
    }

    /// Dropping the subscription is the unsubscribe.
    pub fn unmount(self) {}
}
