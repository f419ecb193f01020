use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four user roles. Each maps to a fixed permission set, see
/// [`crate::permissions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Volunteer,
    Internal,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Donor, Role::Volunteer, Role::Internal, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Volunteer => "volunteer",
            Role::Internal => "internal",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == name.trim())
    }

    /// Role assigned when a profile is first created.
    ///
    /// Development fallback only: the address is matched by substring and
    /// nothing checks it against a canonical source.
    pub fn from_email(email: &str) -> Role {
        let email = email.to_lowercase();
        if email.contains("interno") || email.contains("admin") {
            Role::Internal
        } else if email.contains("voluntario") {
            Role::Volunteer
        } else {
            Role::Donor
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a profile. The id is the auth user's id.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserCreate {
    /// Profile defaults for a freshly authenticated user: name from the email
    /// local part, role from [`Role::from_email`].
    pub fn for_auth_user(id: Uuid, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id,
            name,
            email: email.to_string(),
            role: Role::from_email(email),
        }
    }
}

/// Payload for updating an existing profile.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub theme: Option<Theme>,
    pub role: Option<Role>,
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser {
    pub id: Uuid,
    pub role: Role,
}

impl ActingUser {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

impl From<&User> for ActingUser {
    fn from(user: &User) -> Self {
        Self { id: user.id, role: user.role }
    }
}
