//! Category reference data. Seeded once at startup and read-only afterwards.

use thiserror::Error;
use uuid::Uuid;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Category, CategoryCreate};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(Uuid),
    #[error("Categories are read-only")]
    ReadOnly,
    #[error("Category validation error: {0}")]
    ValidationError(String),
    #[error("Category repository error: {0}")]
    Repository(String),
}

impl From<FrameworkError<CategoryError>> for CategoryError {
    fn from(err: FrameworkError<CategoryError>) -> Self {
        match err {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => match Uuid::parse_str(&id) {
                Ok(id) => CategoryError::NotFound(id),
                Err(_) => CategoryError::Repository(format!("unknown category id {id}")),
            },
            other => CategoryError::Repository(other.to_string()),
        }
    }
}

impl Entity for Category {
    type Id = Uuid;
    type CreateParams = CategoryCreate;
    type Patch = ();
    type Filter = ();
    type Action = ();
    type ActionResult = ();
    type DeleteGuard = ();
    type Error = CategoryError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn from_create_params(id: Uuid, params: CategoryCreate) -> Result<Self, CategoryError> {
        if params.name.trim().is_empty() {
            return Err(CategoryError::ValidationError("name is required".to_string()));
        }
        tracing::trace!(category = %params.name, "Seeding category");
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            color: params.color,
            icon: params.icon,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), CategoryError> {
        Err(CategoryError::ReadOnly)
    }

    fn on_delete(&self, _guard: &()) -> Result<(), CategoryError> {
        Err(CategoryError::ReadOnly)
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), CategoryError> {
        Ok(())
    }
}
