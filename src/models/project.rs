use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client: String,
    pub description: String,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl NewProject {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)
    }
}

impl Project {
    pub fn apply(&mut self, patch: &ProjectPatch) -> AppResult<()> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
            self.name = name.trim().to_string();
        }
        if let Some(client) = &patch.client {
            self.client = client.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("project name must not be empty".into()));
    }
    Ok(())
}
