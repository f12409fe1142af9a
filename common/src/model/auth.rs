use serde::{Deserialize, Serialize};

/// Access level carried by the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "superadmin" => Some(Role::Superadmin),
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// Payload of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Option<Role>,
    pub client_slug: Option<String>,
}

/// Payload of `GET /auth/me` (or the `/auth/validate` fallback).
///
/// All fields are optional: older backends answer with a bare object, and
/// the caller falls back to whatever it had persisted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MeResponse {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub client_slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_wire_values() {
        assert_eq!(Role::parse("superadmin"), Some(Role::Superadmin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn login_response_decodes() {
        let json = r#"{"access_token": "tok-1", "role": "admin", "client_slug": "faives"}"#;
        let res: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.access_token, "tok-1");
        assert_eq!(res.role, Some(Role::Admin));
        assert_eq!(res.client_slug.as_deref(), Some("faives"));
    }

    #[test]
    fn me_response_tolerates_sparse_body() {
        let res: MeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(res, MeResponse::default());
    }
}
