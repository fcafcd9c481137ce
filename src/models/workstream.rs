use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A named category of work under a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workstream {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkstream {
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkstreamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewWorkstream {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)
    }
}

impl Workstream {
    pub fn apply(&mut self, patch: &WorkstreamPatch) -> AppResult<()> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("workstream name must not be empty".into()));
    }
    Ok(())
}
