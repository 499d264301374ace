//! Dashboard user accounts and roles.

use serde::{Deserialize, Serialize};

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account as listed by the admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: i64,
}

/// Payload for creating an account.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn test_admin_user_wire_parse() {
        let user: AdminUser = serde_json::from_value(serde_json::json!({
            "id": 3,
            "username": "moderator",
            "role": "admin",
            "created_at": 1735689600
        }))
        .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.username, "moderator");
    }

    #[test]
    fn test_new_user_wire_shape() {
        let body = serde_json::to_value(NewUser {
            username: "helper".to_string(),
            password: "hunter2".to_string(),
            role: Role::User,
        })
        .unwrap();
        assert_eq!(body["role"], "user");
    }
}
