use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{ActingUser, Role, Theme, User, UserCreate, UserPatch};
use crate::permissions::{has_permission, Permission};
use crate::session::AuthUser;
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub theme: Option<Theme>,
}

impl UserClient {
    /// Returns the profile for an authenticated user, creating it on first
    /// sight. Two sessions racing to create the same profile both end up
    /// with the stored one.
    #[instrument(skip(self, auth_user), fields(user_id = %auth_user.id))]
    pub async fn ensure_profile(&self, auth_user: &AuthUser) -> Result<User, UserError> {
        if let Some(existing) = self.inner.get(auth_user.id).await? {
            debug!("Profile already exists");
            return Ok(existing);
        }

        let create = UserCreate::for_auth_user(auth_user.id, &auth_user.email);
        match self.inner.create(create).await {
            Ok(user) => {
                info!(role = %user.role, "Profile created");
                Ok(user)
            }
            Err(FrameworkError::AlreadyExists(_)) => {
                debug!("Profile created concurrently, reloading");
                self.inner
                    .get(auth_user.id)
                    .await?
                    .ok_or(UserError::NotFound(auth_user.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Edits the acting user's own profile.
    #[instrument(skip(self, actor, update))]
    pub async fn update_profile(
        &self,
        actor: Option<&ActingUser>,
        update: ProfileUpdate,
    ) -> Result<User, UserError> {
        let actor = actor.ok_or(UserError::Unauthenticated)?;
        let patch = UserPatch {
            name: update.name,
            theme: update.theme,
            role: None,
        };
        let user = self.inner.update(actor.id, patch).await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Administrative role change.
    #[instrument(skip(self, actor))]
    pub async fn set_role(
        &self,
        actor: Option<&ActingUser>,
        user_id: Uuid,
        role: Role,
    ) -> Result<User, UserError> {
        let actor = actor.ok_or(UserError::Unauthenticated)?;
        require_manage_users(actor)?;
        let patch = UserPatch { role: Some(role), ..Default::default() };
        let user = self.inner.update(user_id, patch).await?;
        info!(%user_id, %role, changed_by = %actor.id, "Role changed");
        Ok(user)
    }

    #[instrument(skip(self, actor))]
    pub async fn list_users(
        &self,
        actor: Option<&ActingUser>,
        role: Option<Role>,
    ) -> Result<Vec<User>, UserError> {
        let actor = actor.ok_or(UserError::Unauthenticated)?;
        require_manage_users(actor)?;
        let users = self.inner.list(role, None).await?;
        debug!(user_count = users.len(), "Listed users");
        Ok(users)
    }
}

fn require_manage_users(actor: &ActingUser) -> Result<(), UserError> {
    if has_permission(actor.role, Permission::ManageUsers) {
        Ok(())
    } else {
        warn!(user_id = %actor.id, role = %actor.role, "User management denied");
        Err(UserError::Forbidden(format!("role {} lacks {}", actor.role, Permission::ManageUsers)))
    }
}
