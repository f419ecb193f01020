use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::category_actor::CategoryError;
use crate::domain::{Category, CategoryCreate};

/// Client for the read-only category reference data.
#[derive(Clone)]
pub struct CategoryClient {
    inner: ResourceClient<Category>,
}

impl_basic_client!(CategoryClient, Category, CategoryError, category);

impl CategoryClient {
    /// Loads the given categories. Called once by the system at startup.
    #[instrument(skip(self, categories), fields(count = categories.len()))]
    pub async fn seed(&self, categories: Vec<CategoryCreate>) -> Result<Vec<Category>, CategoryError> {
        let mut seeded = Vec::with_capacity(categories.len());
        for category in categories {
            seeded.push(self.inner.create(category).await?);
        }
        info!("Categories seeded");
        Ok(seeded)
    }

    /// All categories, alphabetically.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        let mut categories = self.inner.list((), None).await?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(category_count = categories.len(), "Listed categories");
        Ok(categories)
    }
}
