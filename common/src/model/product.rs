use serde::{Deserialize, Serialize};

/// A lookup that hit a product, persisted server-side as a history entry.
///
/// Immutable once created; the client may only delete it. `datahora` is
/// kept as the raw string the backend sends (ISO-8601); parsing happens in
/// the filter/export layers that actually need a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundProduct {
    pub id: i64,
    #[serde(default)]
    pub client_id: i64,
    #[serde(default)]
    pub base: String,
    pub codauxiliar: String,
    pub codprod: String,
    pub descricao: Option<String>,
    pub datahora: String,
}

/// A lookup that missed, persisted server-side as a history entry.
///
/// `descricao` is the one client-editable field (PATCH); everything else is
/// immutable from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotFoundProduct {
    pub id: i64,
    #[serde(default)]
    pub client_id: i64,
    #[serde(default)]
    pub base: String,
    pub codauxiliar: String,
    pub descricao: Option<String>,
    pub datahora: String,
}

/// Successful payload of `GET /sqlite/{base}/produto/{code}`.
///
/// The search endpoint reports the product fields with upper-cased column
/// names and, when the fallback base answered instead of the requested one,
/// a `_base` marker naming the base that actually matched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductHit {
    pub codauxiliar: String,
    #[serde(rename = "CODPROD")]
    pub codprod: String,
    #[serde(rename = "DESCRICAO")]
    pub descricao: String,
    #[serde(rename = "_base")]
    pub base_hit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_product_decodes_backend_row() {
        let json = r#"{
            "id": 12,
            "client_id": 3,
            "base": "homecenter",
            "codauxiliar": "7891000100103",
            "codprod": "55821",
            "descricao": "LEITE CONDENSADO 395G",
            "datahora": "2025-08-12T14:03:55"
        }"#;
        let item: FoundProduct = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 12);
        assert_eq!(item.codprod, "55821");
        assert_eq!(item.descricao.as_deref(), Some("LEITE CONDENSADO 395G"));
    }

    #[test]
    fn not_found_product_allows_null_description_and_missing_tenant_fields() {
        let json = r#"{
            "id": 7,
            "codauxiliar": "0000000000000",
            "descricao": null,
            "datahora": "2025-08-12T14:05:00"
        }"#;
        let item: NotFoundProduct = serde_json::from_str(json).unwrap();
        assert_eq!(item.descricao, None);
        assert_eq!(item.client_id, 0);
        assert_eq!(item.base, "");
    }

    #[test]
    fn product_hit_decodes_uppercased_columns_and_fallback_marker() {
        let json = r#"{
            "codauxiliar": "7891000100103",
            "CODPROD": "55821",
            "DESCRICAO": "LEITE CONDENSADO 395G",
            "_base": "mercado"
        }"#;
        let hit: ProductHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.codprod, "55821");
        assert_eq!(hit.base_hit.as_deref(), Some("mercado"));

        let json = r#"{
            "codauxiliar": "7891000100103",
            "CODPROD": "55821",
            "DESCRICAO": "LEITE CONDENSADO 395G"
        }"#;
        let hit: ProductHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.base_hit, None);
    }
}
