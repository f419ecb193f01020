use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{AuthError, AuthProvider, AuthUser};

const MIN_PASSWORD_CHARS: usize = 6;

struct Account {
    user: AuthUser,
    password_hash: String,
}

struct State {
    accounts: RwLock<HashMap<String, Account>>,
    session: watch::Sender<Option<AuthUser>>,
}

/// Auth provider backed by a process-local account table with Argon2id
/// password hashes. Intended for development and tests.
#[derive(Clone)]
pub struct InMemoryAuthProvider {
    state: Arc<State>,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            state: Arc::new(State {
                accounts: RwLock::new(HashMap::new()),
                session,
            }),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let key = normalize(email);
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword(format!(
                "must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        // Argon2 runs before the account table is locked.
        let password_hash = run_blocking({
            let password = password.to_owned();
            move || hash_password(&password)
        })
        .await?;

        let mut accounts = self.state.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken(key));
        }
        let user = AuthUser { id: Uuid::new_v4(), email: key.clone() };
        accounts.insert(key, Account { user: user.clone(), password_hash });
        drop(accounts);
        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }
}

impl AuthProvider for InMemoryAuthProvider {
    async fn current_user(&self) -> Option<AuthUser> {
        self.state.session.borrow().clone()
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let (user, password_hash) = {
            let accounts = self.state.accounts.read().await;
            let account = accounts.get(&normalize(email)).ok_or(AuthError::InvalidCredentials)?;
            (account.user.clone(), account.password_hash.clone())
        };
        let matches = run_blocking({
            let password = password.to_owned();
            move || verify_password(&password, &password_hash)
        })
        .await?;
        if !matches {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        self.state.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.state.session.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.session.subscribe()
    }
}

async fn run_blocking<T: Send + 'static>(
    work: impl FnOnce() -> Result<T, AuthError> + Send + 'static,
) -> Result<T, AuthError> {
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Crypto(format!("hashing task failed: {e}")))?
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}
