use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Donation category. Reference data, read-only once seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryCreate {
    fn seed(name: &str, description: &str, color: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            color: Some(color.to_string()),
            icon: Some(icon.to_string()),
        }
    }
}

/// The categories loaded at startup.
pub fn default_categories() -> Vec<CategoryCreate> {
    vec![
        CategoryCreate::seed("Alimentos", "Alimentos não perecíveis e cestas básicas", "#16a34a", "apple"),
        CategoryCreate::seed("Roupas", "Roupas, calçados e agasalhos", "#2563eb", "shirt"),
        CategoryCreate::seed("Móveis", "Móveis e utensílios domésticos", "#92400e", "sofa"),
        CategoryCreate::seed("Eletrônicos", "Eletrônicos e eletrodomésticos", "#7c3aed", "monitor"),
        CategoryCreate::seed("Brinquedos", "Brinquedos e jogos", "#db2777", "puzzle"),
        CategoryCreate::seed("Livros", "Livros e material escolar", "#ca8a04", "book"),
        CategoryCreate::seed("Higiene", "Produtos de higiene e limpeza", "#0891b2", "droplet"),
        CategoryCreate::seed("Outros", "Outros itens", "#6b7280", "package"),
    ]
}
