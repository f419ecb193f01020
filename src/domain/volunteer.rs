use serde::{Deserialize, Serialize};

/// A volunteer sign-up submitted through the public form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub interest_areas: Vec<String>,
    pub availability: String,
    #[serde(default)]
    pub prior_experience: Option<String>,
}
