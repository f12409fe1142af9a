//! Session gate: the bearer token, the identity derived from it, and the
//! storage keys that survive a page reload.
//!
//! Startup flow (driven by `App`): no stored token means immediately
//! logged-out with no network call; a stored token is validated against
//! the backend and the outcome is decided by `resolve_validation`, which
//! deliberately keeps the session alive on transient network failures —
//! a flaky connection during startup must not force a re-login. Only an
//! explicit 401/403 demotes the session.

use common::model::auth::{LoginResponse, MeResponse, Role};
use common::model::base::BaseName;
use gloo_storage::{LocalStorage, Storage};

use crate::api::ApiError;

const TOKEN_KEY: &str = "sb_token";
const ROLE_KEY: &str = "sb_role";
const CLIENT_KEY: &str = "sb_client";
const BASE_KEY: &str = "sb_base";

/// An authenticated identity: the token plus what the backend told us
/// about it. Constructed once (login or startup validation) and threaded
/// explicitly into every component that issues requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub role: Option<Role>,
    pub client_slug: Option<String>,
}

impl Session {
    pub fn is_superadmin(&self) -> bool {
        self.role == Some(Role::Superadmin)
    }

    pub fn from_login(login: LoginResponse) -> Session {
        Session {
            token: login.access_token,
            role: login.role,
            client_slug: login.client_slug,
        }
    }
}

/// Decision of the startup validation, separated from I/O so the
/// availability-over-consistency rule is testable.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResolution {
    Authenticated(Session),
    LoggedOut,
}

/// Resolves a "who am I" outcome for a stored token.
///
/// - success: trust the backend's role/slug;
/// - 401/403: the token is dead, demote;
/// - anything else (network, 5xx, bad body): keep the previously persisted
///   role/slug and stay authenticated.
pub fn resolve_validation(
    token: String,
    outcome: Result<MeResponse, ApiError>,
    stored_role: Option<Role>,
    stored_slug: Option<String>,
) -> SessionResolution {
    match outcome {
        Ok(me) => SessionResolution::Authenticated(Session {
            token,
            role: me.role,
            client_slug: me.client_slug,
        }),
        Err(err) if err.is_auth() => SessionResolution::LoggedOut,
        Err(_) => SessionResolution::Authenticated(Session {
            token,
            role: stored_role,
            client_slug: stored_slug,
        }),
    }
}

// ---------- persisted state ----------

pub fn stored_token() -> Option<String> {
    LocalStorage::get(TOKEN_KEY).ok()
}

pub fn stored_role() -> Option<Role> {
    LocalStorage::get::<String>(ROLE_KEY)
        .ok()
        .and_then(|value| Role::parse(&value))
}

pub fn stored_client_slug() -> Option<String> {
    LocalStorage::get(CLIENT_KEY).ok()
}

/// Persists token, role and tenant slug together so a reload restores the
/// same identity the validation fallback expects to find.
pub fn persist(session: &Session) {
    let _ = LocalStorage::set(TOKEN_KEY, &session.token);
    match session.role {
        Some(role) => {
            let _ = LocalStorage::set(ROLE_KEY, role.as_str());
        }
        None => LocalStorage::delete(ROLE_KEY),
    }
    match &session.client_slug {
        Some(slug) => {
            let _ = LocalStorage::set(CLIENT_KEY, slug);
        }
        None => LocalStorage::delete(CLIENT_KEY),
    }
}

/// Clears every auth key at once. The base selection survives a logout on
/// purpose; it is a device preference, not an identity.
pub fn clear() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(ROLE_KEY);
    LocalStorage::delete(CLIENT_KEY);
}

pub fn stored_base() -> BaseName {
    LocalStorage::get::<String>(BASE_KEY)
        .map(|value| BaseName::parse(&value))
        .unwrap_or_default()
}

pub fn persist_base(base: BaseName) {
    let _ = LocalStorage::set(BASE_KEY, base.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me(role: Option<Role>, slug: Option<&str>) -> MeResponse {
        MeResponse {
            email: None,
            role,
            client_slug: slug.map(str::to_owned),
        }
    }

    #[test]
    fn validation_success_trusts_the_backend_identity() {
        let resolution = resolve_validation(
            "tok".into(),
            Ok(me(Some(Role::Admin), Some("faives"))),
            Some(Role::User),
            None,
        );
        match resolution {
            SessionResolution::Authenticated(session) => {
                assert_eq!(session.token, "tok");
                assert_eq!(session.role, Some(Role::Admin));
                assert_eq!(session.client_slug.as_deref(), Some("faives"));
            }
            SessionResolution::LoggedOut => panic!("expected authenticated"),
        }
    }

    #[test]
    fn auth_failure_demotes_the_session() {
        let resolution = resolve_validation(
            "tok".into(),
            Err(ApiError::Unauthorized),
            Some(Role::Admin),
            Some("faives".into()),
        );
        assert_eq!(resolution, SessionResolution::LoggedOut);
    }

    #[test]
    fn network_failure_keeps_the_stored_identity() {
        let resolution = resolve_validation(
            "tok".into(),
            Err(ApiError::Network("timeout".into())),
            Some(Role::Superadmin),
            Some("faives".into()),
        );
        assert_eq!(
            resolution,
            SessionResolution::Authenticated(Session {
                token: "tok".into(),
                role: Some(Role::Superadmin),
                client_slug: Some("faives".into()),
            })
        );
    }

    #[test]
    fn server_error_also_keeps_the_stored_identity() {
        let resolution = resolve_validation(
            "tok".into(),
            Err(ApiError::Api { status: 502, detail: "bad gateway".into() }),
            None,
            None,
        );
        assert!(matches!(resolution, SessionResolution::Authenticated(_)));
    }
}
