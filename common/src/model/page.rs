use serde::Deserialize;

/// Cursor-paginated history page.
///
/// The history endpoints answer in this shape when queried with
/// `cursor_id`/`per_page`: the next batch of rows plus an opaque id to
/// resume from. A missing/null `next_cursor_id` means the collection is
/// exhausted, which is the termination condition for incremental loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub next_cursor_id: Option<i64>,
}

/// Offset-paginated history page.
///
/// Only consumed with `page=1&per_page=1` to read `total`: the backend has
/// no dedicated count endpoint, so a one-row offset query is the cheapest
/// way to learn how many rows exist. The `items` are discarded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OffsetPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::product::NotFoundProduct;

    #[test]
    fn cursor_page_decodes_with_and_without_next_cursor() {
        let json = r#"{
            "items": [
                {"id": 9, "codauxiliar": "123", "descricao": null, "datahora": "2025-08-12T10:00:00"}
            ],
            "per_page": 50,
            "next_cursor_id": 9,
            "mode": "cursor"
        }"#;
        let page: CursorPage<NotFoundProduct> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor_id, Some(9));

        let json = r#"{"items": [], "per_page": 50, "next_cursor_id": null, "mode": "cursor"}"#;
        let page: CursorPage<NotFoundProduct> = serde_json::from_str(json).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor_id, None);
    }

    #[test]
    fn offset_page_exposes_total() {
        let json = r#"{
            "items": [
                {"id": 1, "codauxiliar": "1", "descricao": "x", "datahora": "2025-08-12T10:00:00"}
            ],
            "page": 1,
            "per_page": 1,
            "total": 734,
            "pages": 734,
            "has_next": true,
            "has_prev": false,
            "mode": "offset"
        }"#;
        let page: OffsetPage<NotFoundProduct> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 734);
    }
}
