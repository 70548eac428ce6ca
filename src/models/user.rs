//! # User Model
//!
//! Account records backing the access-control gate. Users own tasks; the
//! bearer credential (`api_token`) is provisioned out of band and never
//! serialized into responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account role. Admins see and mutate every task and may list users;
/// regular users are scoped to the tasks they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Regular,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role '{0}' (expected 'regular' or 'admin')")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Role::Regular),
            "admin" => Ok(Role::Admin),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub role: Role,
    /// Opaque bearer credential. Never serialized in responses.
    #[serde(skip)]
    pub api_token: String,
}

/// Admin-surface row: a user plus how many tasks they own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub role: Role,
    pub tasks_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("regular".parse::<Role>().unwrap(), Role::Regular);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_api_token_never_serialized() {
        let user = User {
            id: 1,
            nickname: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Regular,
            api_token: "secret-token".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(json.contains("\"role\":\"regular\""));
    }
}
