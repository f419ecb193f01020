use chrono::Utc;
use uuid::Uuid;

use super::error::UserError;
use crate::actor_framework::Entity;
use crate::domain::{Role, Theme, User, UserCreate, UserPatch};

impl Entity for User {
    type Id = Uuid;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Filter = Option<Role>;
    type Action = ();
    type ActionResult = ();
    type DeleteGuard = ();
    type Error = UserError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    /// Profiles share the auth user's id.
    fn requested_id(params: &UserCreate) -> Option<Uuid> {
        Some(params.id)
    }

    /// Creates a new profile with the default theme.
    ///
    /// # Errors
    /// Rejects an empty email address.
    fn from_create_params(id: Uuid, params: UserCreate) -> Result<Self, UserError> {
        if params.email.trim().is_empty() {
            return Err(UserError::ValidationError("email is required".to_string()));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            theme: Theme::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the profile's name, theme and/or role.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(UserError::ValidationError("name must not be empty".to_string()));
            }
            self.name = name.to_string();
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn matches(&self, filter: &Option<Role>) -> bool {
        filter.map_or(true, |role| self.role == role)
    }

    /// No custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
