//! Authentication boundary and the per-process session.
//!
//! [`SessionContext`] is the single owner of "who is signed in". Clients never
//! read it implicitly: callers pass [`SessionContext::acting_user`] into each
//! operation.

mod memory;

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::clients::UserClient;
use crate::domain::{ActingUser, User};
use crate::user_actor::UserError;

pub use memory::InMemoryAuthProvider;

/// Identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Password rejected: {0}")]
    WeakPassword(String),
    #[error("Password hashing error: {0}")]
    Crypto(String),
    #[error("Profile error: {0}")]
    Profile(#[from] UserError),
}

/// External authentication service.
pub trait AuthProvider: Send + Sync + 'static {
    fn current_user(&self) -> impl Future<Output = Option<AuthUser>> + Send;

    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<AuthUser, AuthError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Provider-side session changes (login, logout, expiry).
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;
}

/// The signed-in user and their profile.
///
/// A background task follows the provider session: once the provider no
/// longer reports the profile's identity (logout, expiry, another login),
/// the profile is cleared.
pub struct SessionContext<A: AuthProvider> {
    auth: A,
    users: UserClient,
    profile: Arc<watch::Sender<Option<User>>>,
    watcher: JoinHandle<()>,
}

impl<A: AuthProvider> SessionContext<A> {
    /// Must be called inside a Tokio runtime.
    pub fn new(auth: A, users: UserClient) -> Self {
        let (profile, _) = watch::channel(None);
        let profile = Arc::new(profile);
        let watcher = tokio::spawn(follow_provider(auth.subscribe(), profile.clone()));
        Self { auth, users, profile, watcher }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Logs in and loads the profile, creating it on first sign-in.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let auth_user = self.auth.login(email, password).await.inspect_err(|e| {
            warn!(error = %e, "Sign-in rejected");
        })?;
        let profile = match self.users.ensure_profile(&auth_user).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %auth_user.id, error = %e, "Profile unavailable, ending provider session");
                if let Err(logout) = self.auth.logout().await {
                    warn!(error = %logout, "Logout after failed sign-in also failed");
                }
                return Err(e.into());
            }
        };
        info!(user_id = %profile.id, role = %profile.role, "Signed in");
        self.profile.send_replace(Some(profile.clone()));
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.logout().await?;
        if let Some(previous) = self.profile.send_replace(None) {
            info!(user_id = %previous.id, "Signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<User> {
        self.profile.borrow().clone()
    }

    pub fn acting_user(&self) -> Option<ActingUser> {
        self.profile.borrow().as_ref().map(ActingUser::from)
    }

    /// Re-reads the provider session and the stored profile, picking up
    /// role or name changes made elsewhere.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Option<User>, AuthError> {
        let profile = match self.auth.current_user().await {
            Some(auth_user) => Some(self.users.ensure_profile(&auth_user).await?),
            None => None,
        };
        self.profile.send_replace(profile.clone());
        Ok(profile)
    }

    /// Notified whenever the signed-in profile changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.profile.subscribe()
    }
}

impl<A: AuthProvider> Drop for SessionContext<A> {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn follow_provider(mut provider: watch::Receiver<Option<AuthUser>>, profile: Arc<watch::Sender<Option<User>>>) {
    while provider.changed().await.is_ok() {
        profile.send_if_modified(|current| {
            // Read under the profile lock so a concurrent sign-in is never undone.
            let signed_in = provider.borrow_and_update().as_ref().map(|user| user.id);
            let stale = current.as_ref().map(|user| user.id).filter(|id| Some(*id) != signed_in);
            match stale {
                Some(user_id) => {
                    debug!(%user_id, "Provider session ended, clearing profile");
                    *current = None;
                    true
                }
                None => false,
            }
        });
    }
    debug!("Auth provider closed its session channel");
}
