//! Remote data gateway for the lookup backend.
//!
//! All outbound HTTP lives here: auth, product search, cursor-paged history
//! fetches, the one-row offset probe used to read totals, deletes, the
//! description patch, and privileged user creation.
//!
//! Responses are decoded into `common` types exactly once, at this
//! boundary; callers never inspect raw bodies or status codes. Failures are
//! classified into the `ApiError` taxonomy below, and every caller treats
//! `ApiError::Unauthorized` as a session-wide demotion signal.

use common::model::auth::{LoginResponse, MeResponse};
use common::model::base::BaseName;
use common::model::page::{CursorPage, OffsetPage};
use common::model::product::{FoundProduct, NotFoundProduct, ProductHit};
use common::requests::{LoginRequest, NewUserRequest, UpdateDescriptionRequest};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config;

/// Fixed cursor page size for history fetches.
pub const PAGE_SIZE: u32 = 50;

/// Failure taxonomy for every backend call.
///
/// 404 is not a fault for product search (a miss is a normal outcome) and
/// 409 marks a code that is already registered; both carry the backend's
/// `detail` message so the UI can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401/403. Always triggers the silent logout path in the caller.
    #[error("não autorizado")]
    Unauthorized,
    /// 404 with the backend's detail message.
    #[error("{0}")]
    NotFound(String),
    /// 409, duplicate registration.
    #[error("{0}")]
    Conflict(String),
    /// Any other non-2xx answer.
    #[error("erro {status}: {detail}")]
    Api { status: u16, detail: String },
    /// No response at all (network/CORS/timeout).
    #[error("falha de rede: {0}")]
    Network(String),
    /// 2xx with a body that does not match the contract.
    #[error("resposta inválida: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Maps an HTTP status plus extracted detail message onto the taxonomy.
fn classify(status: u16, detail: String) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound(detail),
        409 => ApiError::Conflict(detail),
        status => ApiError::Api { status, detail },
    }
}

/// Pulls the `detail` field out of the backend's JSON error envelope,
/// falling back to a generic message when the body is absent or opaque.
fn extract_detail(body: Option<String>) -> String {
    body.as_deref()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
        .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
        .unwrap_or_else(|| "erro interno".to_string())
}

async fn error_for(response: Response) -> ApiError {
    let status = response.status();
    let detail = extract_detail(response.text().await.ok());
    classify(status, detail)
}

async fn parse_json<T: DeserializeOwned>(
    sent: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(error_for(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn parse_unit(sent: Result<Response, gloo_net::Error>) -> Result<(), ApiError> {
    let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(error_for(response).await);
    }
    Ok(())
}

/// Cursor-mode query string for the history endpoints.
fn cursor_query(base: BaseName, cursor: Option<i64>, per_page: u32) -> String {
    let mut query = format!("per_page={}&base={}", per_page, base.as_str());
    if let Some(id) = cursor {
        query.push_str(&format!("&cursor_id={}", id));
    }
    query
}

/// Offset-mode query string sized to read `total` and nothing else.
/// The backend has no count endpoint; this is its documented substitute.
fn totals_query(base: BaseName) -> String {
    format!("page=1&per_page=1&base={}", base.as_str())
}

fn search_path(base: BaseName, code: &str) -> String {
    format!(
        "/sqlite/{}/produto/{}?parallel=1&fallback=1",
        base.as_str(),
        urlencoding::encode(code)
    )
}

/// Thin client over the backend HTTP surface.
///
/// Carries the base URL and the bearer token explicitly; it is constructed
/// from the active `Session` and threaded into every component that talks
/// to the backend, so no request ever reads ambient storage mid-flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(token: Option<String>) -> Self {
        ApiClient {
            base_url: config::api_base_url().to_string(),
            token,
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::get(&self.url(path)))
    }

    // ---------- auth ----------

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = Request::post(&self.url("/auth/login"))
            .json(&body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_json(request.send().await).await
    }

    /// Validates the carried token. Tries `/auth/me` first and falls back
    /// to `/auth/validate` for backends that only expose the older path.
    pub async fn validate(&self) -> Result<MeResponse, ApiError> {
        match parse_json::<MeResponse>(self.get("/auth/me").send().await).await {
            Err(ApiError::NotFound(_)) => {
                parse_json(self.get("/auth/validate").send().await).await
            }
            result => result,
        }
    }

    // ---------- product search ----------

    pub async fn search_product(&self, base: BaseName, code: &str) -> Result<ProductHit, ApiError> {
        parse_json(self.get(&search_path(base, code)).send().await).await
    }

    // ---------- history, cursor mode ----------

    pub async fn found_page(
        &self,
        base: BaseName,
        cursor: Option<i64>,
    ) -> Result<CursorPage<FoundProduct>, ApiError> {
        let path = format!("/sqlite/encontrados?{}", cursor_query(base, cursor, PAGE_SIZE));
        parse_json(self.get(&path).send().await).await
    }

    pub async fn not_found_page(
        &self,
        base: BaseName,
        cursor: Option<i64>,
    ) -> Result<CursorPage<NotFoundProduct>, ApiError> {
        let path = format!(
            "/sqlite/nao-encontrados?{}",
            cursor_query(base, cursor, PAGE_SIZE)
        );
        parse_json(self.get(&path).send().await).await
    }

    // ---------- history, totals probe ----------

    pub async fn found_total(&self, base: BaseName) -> Result<u64, ApiError> {
        let path = format!("/sqlite/encontrados?{}", totals_query(base));
        let page: OffsetPage<FoundProduct> = parse_json(self.get(&path).send().await).await?;
        Ok(page.total)
    }

    pub async fn not_found_total(&self, base: BaseName) -> Result<u64, ApiError> {
        let path = format!("/sqlite/nao-encontrados?{}", totals_query(base));
        let page: OffsetPage<NotFoundProduct> = parse_json(self.get(&path).send().await).await?;
        Ok(page.total)
    }

    // ---------- history, mutations ----------

    pub async fn delete_found(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/sqlite/encontrados/{}", id);
        parse_unit(self.authorized(Request::delete(&self.url(&path))).send().await).await
    }

    pub async fn delete_not_found(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/sqlite/nao-encontrados/{}", id);
        parse_unit(self.authorized(Request::delete(&self.url(&path))).send().await).await
    }

    pub async fn update_description(&self, id: i64, descricao: &str) -> Result<(), ApiError> {
        let path = format!("/sqlite/nao-encontrados/{}", id);
        let body = UpdateDescriptionRequest {
            descricao: descricao.to_string(),
        };
        let request = self
            .authorized(Request::patch(&self.url(&path)))
            .json(&body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_unit(request.send().await).await
    }

    // ---------- admin ----------

    pub async fn create_user(&self, new_user: &NewUserRequest) -> Result<(), ApiError> {
        let request = self
            .authorized(Request::post(&self.url("/admin/users")))
            .json(new_user)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_unit(request.send().await).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_query_without_cursor_is_a_first_page_request() {
        assert_eq!(
            cursor_query(BaseName::Homecenter, None, 50),
            "per_page=50&base=homecenter"
        );
    }

    #[test]
    fn cursor_query_resumes_from_the_given_cursor() {
        assert_eq!(
            cursor_query(BaseName::Mercado, Some(913), 50),
            "per_page=50&base=mercado&cursor_id=913"
        );
    }

    #[test]
    fn totals_query_asks_for_a_single_row() {
        assert_eq!(totals_query(BaseName::Mercado), "page=1&per_page=1&base=mercado");
    }

    #[test]
    fn search_path_percent_encodes_the_code() {
        assert_eq!(
            search_path(BaseName::Homecenter, "78 91#"),
            "/sqlite/homecenter/produto/78%2091%23?parallel=1&fallback=1"
        );
    }

    #[test]
    fn classify_maps_auth_statuses_to_unauthorized() {
        assert_eq!(classify(401, "x".into()), ApiError::Unauthorized);
        assert_eq!(classify(403, "x".into()), ApiError::Unauthorized);
    }

    #[test]
    fn classify_distinguishes_miss_from_duplicate() {
        assert_eq!(
            classify(404, "produto não encontrado".into()),
            ApiError::NotFound("produto não encontrado".into())
        );
        assert_eq!(
            classify(409, "código já registrado".into()),
            ApiError::Conflict("código já registrado".into())
        );
        assert!(matches!(classify(500, "boom".into()), ApiError::Api { status: 500, .. }));
    }

    #[test]
    fn extract_detail_reads_the_error_envelope() {
        assert_eq!(
            extract_detail(Some(r#"{"detail": "código já registrado"}"#.into())),
            "código já registrado"
        );
        assert_eq!(extract_detail(Some("<html>".into())), "erro interno");
        assert_eq!(extract_detail(None), "erro interno");
    }
}
