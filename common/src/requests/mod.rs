use serde::Serialize;

use crate::model::auth::Role;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PATCH /sqlite/nao-encontrados/{id}`.
/// Updates the one client-editable field of a not-found record.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateDescriptionRequest {
    pub descricao: String,
}

/// Body of `POST /admin/users` (privileged).
///
/// `client_slug` is only sent when a superadmin creates a user for another
/// tenant; serde skips it otherwise so lesser roles never name a tenant.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_request_omits_absent_slug() {
        let req = NewUserRequest {
            email: "a@b.c".into(),
            password: "s3cret".into(),
            role: Role::User,
            client_slug: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("client_slug"));
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn update_description_serializes_field_name_the_backend_expects() {
        let req = UpdateDescriptionRequest { descricao: "cabo hdmi".into() };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"descricao":"cabo hdmi"}"#);
    }
}
