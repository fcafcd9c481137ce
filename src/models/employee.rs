use super::role::Role;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String, // ⇔ employees.email (unique, stored lowercase)
    pub designation: String,
    pub role: Role,
    pub active: bool,
    pub created_at: String, // ISO8601
}

/// Payload used to create an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

fn default_role() -> Role {
    Role::Employee
}

impl NewEmployee {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)
    }
}

impl Employee {
    pub fn apply(&mut self, patch: &EmployeePatch) -> AppResult<()> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
            self.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
            self.email = normalize_email(email);
        }
        if let Some(designation) = &patch.designation {
            self.designation = designation.trim().to_string();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("employee name must not be empty".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    let e = email.trim();
    match e.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!("invalid email address '{e}'"))),
    }
}
