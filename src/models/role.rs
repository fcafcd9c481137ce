use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    /// Helper: parse user input (case-insensitive, `a`/`e` shortcuts accepted)
    pub fn parse(input: &str) -> AppResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "admin" | "a" => Ok(Role::Admin),
            "employee" | "e" => Ok(Role::Employee),
            other => Err(AppError::InvalidRole(other.to_string())),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
