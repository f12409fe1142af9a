//! Client-side filter/sort engine.
//!
//! A pure projection over whatever history is currently materialized in
//! memory; it is explicitly not a server-side query, so its accuracy is
//! bounded by how much history has been paged in. One generic `apply`
//! serves both collections through the `FilterableRecord` accessor trait.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use common::model::product::{FoundProduct, NotFoundProduct};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Date,
    Code,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// User-selected criteria. Date bounds are the raw values of the HTML
/// date inputs (`YYYY-MM-DD`, empty when unset).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub search_term: String,
    pub date_from: String,
    pub date_to: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            search_term: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            sort_by: SortBy::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Field access for filtering/sorting, implemented by both record kinds.
pub trait FilterableRecord: Clone {
    fn codauxiliar(&self) -> &str;
    fn codprod(&self) -> Option<&str>;
    fn descricao(&self) -> Option<&str>;
    fn datahora(&self) -> &str;
}

impl FilterableRecord for FoundProduct {
    fn codauxiliar(&self) -> &str {
        &self.codauxiliar
    }
    fn codprod(&self) -> Option<&str> {
        Some(&self.codprod)
    }
    fn descricao(&self) -> Option<&str> {
        self.descricao.as_deref()
    }
    fn datahora(&self) -> &str {
        &self.datahora
    }
}

impl FilterableRecord for NotFoundProduct {
    fn codauxiliar(&self) -> &str {
        &self.codauxiliar
    }
    fn codprod(&self) -> Option<&str> {
        None
    }
    fn descricao(&self) -> Option<&str> {
        self.descricao.as_deref()
    }
    fn datahora(&self) -> &str {
        &self.datahora
    }
}

/// Parses the backend's `datahora` strings. The backend emits naive
/// ISO-8601; RFC 3339 with an offset is accepted too.
pub fn parse_datahora(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()))
}

/// pt-BR day-first rendering used by the lists and the export; an
/// unparsable timestamp passes through verbatim instead of vanishing.
pub fn format_datahora(value: &str) -> String {
    match parse_datahora(value) {
        Some(when) => when.format("%d/%m/%Y %H:%M").to_string(),
        None => value.to_string(),
    }
}

fn matches_term<T: FilterableRecord>(item: &T, term_lower: &str) -> bool {
    item.codauxiliar().to_lowercase().contains(term_lower)
        || item
            .codprod()
            .is_some_and(|code| code.to_lowercase().contains(term_lower))
        || item
            .descricao()
            .is_some_and(|text| text.to_lowercase().contains(term_lower))
}

/// Filters and sorts a materialized collection.
///
/// - substring match is case-insensitive over auxiliary code, product code
///   (when present) and description;
/// - date bounds are inclusive: `date_to` covers the whole end day; a
///   record whose timestamp cannot be parsed is dropped while a bound is
///   active;
/// - the sort is stable, so equal-key items keep their input order and a
///   missing description sorts as the empty string (first ascending, last
///   descending).
pub fn apply<T: FilterableRecord>(items: &[T], filters: &FilterOptions) -> Vec<T> {
    let term_lower = filters.search_term.trim().to_lowercase();
    let from = NaiveDate::parse_from_str(&filters.date_from, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN));
    let to_exclusive = NaiveDate::parse_from_str(&filters.date_to, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.succ_opt())
        .map(|date| date.and_time(NaiveTime::MIN));

    let mut filtered: Vec<T> = items
        .iter()
        .filter(|item| term_lower.is_empty() || matches_term(*item, &term_lower))
        .filter(|item| {
            if from.is_none() && to_exclusive.is_none() {
                return true;
            }
            let Some(when) = parse_datahora(item.datahora()) else {
                return false;
            };
            from.map_or(true, |bound| when >= bound)
                && to_exclusive.map_or(true, |bound| when < bound)
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match filters.sort_by {
            SortBy::Date => parse_datahora(a.datahora()).cmp(&parse_datahora(b.datahora())),
            SortBy::Code => a.codauxiliar().cmp(b.codauxiliar()),
            SortBy::Description => a
                .descricao()
                .unwrap_or("")
                .cmp(b.descricao().unwrap_or("")),
        };
        match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, codauxiliar: &str, descricao: Option<&str>, datahora: &str) -> NotFoundProduct {
        NotFoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: codauxiliar.into(),
            descricao: descricao.map(str::to_owned),
            datahora: datahora.into(),
        }
    }

    fn found(id: i64, codauxiliar: &str, codprod: &str, descricao: &str) -> FoundProduct {
        FoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: codauxiliar.into(),
            codprod: codprod.into(),
            descricao: Some(descricao.into()),
            datahora: "2025-08-12T10:00:00".into(),
        }
    }

    fn options() -> FilterOptions {
        FilterOptions::default()
    }

    #[test]
    fn term_matches_auxiliary_code_case_insensitively() {
        let items = vec![
            found(1, "ABC123", "10", "martelo"),
            found(2, "999", "11", "prego"),
        ];
        let mut filters = options();
        filters.search_term = "abc".into();
        let result = apply(&items, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn term_also_matches_product_code_and_description() {
        let items = vec![
            found(1, "111", "55821", "martelo"),
            found(2, "222", "999", "Serra TICO-tico"),
        ];
        let mut filters = options();
        filters.search_term = "5582".into();
        assert_eq!(apply(&items, &filters)[0].id, 1);
        filters.search_term = "tico-TICO".into();
        assert_eq!(apply(&items, &filters)[0].id, 2);
    }

    #[test]
    fn date_to_is_inclusive_of_the_whole_end_day() {
        let items = vec![
            record(1, "1", None, "2025-08-12T15:30:00"),
            record(2, "2", None, "2025-08-13T00:10:00"),
        ];
        let mut filters = options();
        filters.date_to = "2025-08-12".into();
        let result = apply(&items, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn date_from_includes_the_start_of_day() {
        let items = vec![
            record(1, "1", None, "2025-08-12T00:00:00"),
            record(2, "2", None, "2025-08-11T23:59:59"),
        ];
        let mut filters = options();
        filters.date_from = "2025-08-12".into();
        let result = apply(&items, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn unparsable_timestamps_are_dropped_only_while_a_bound_is_active() {
        let items = vec![record(1, "1", None, "ontem")];
        let mut filters = options();
        filters.sort_by = SortBy::Code;
        assert_eq!(apply(&items, &filters).len(), 1);
        filters.date_from = "2025-01-01".into();
        assert!(apply(&items, &filters).is_empty());
    }

    #[test]
    fn sort_by_date_desc_puts_newest_first() {
        let items = vec![
            record(1, "1", None, "2025-08-10T10:00:00"),
            record(2, "2", None, "2025-08-12T10:00:00"),
            record(3, "3", None, "2025-08-11T10:00:00"),
        ];
        let result = apply(&items, &options());
        assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn missing_description_sorts_as_empty_string() {
        let items = vec![
            record(1, "1", Some("bucha 8mm"), "2025-08-12T10:00:00"),
            record(2, "2", None, "2025-08-12T10:00:00"),
            record(3, "3", Some("arruela"), "2025-08-12T10:00:00"),
        ];
        let mut filters = options();
        filters.sort_by = SortBy::Description;
        filters.sort_order = SortOrder::Asc;
        let result = apply(&items, &filters);
        assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        filters.sort_order = SortOrder::Desc;
        let result = apply(&items, &filters);
        assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn equal_keys_keep_their_input_order() {
        let items = vec![
            record(1, "1", Some("mesma"), "2025-08-12T10:00:00"),
            record(2, "2", Some("mesma"), "2025-08-12T10:00:00"),
            record(3, "3", Some("mesma"), "2025-08-12T10:00:00"),
        ];
        let mut filters = options();
        filters.sort_by = SortBy::Description;
        for order in [SortOrder::Asc, SortOrder::Desc] {
            filters.sort_order = order;
            let result = apply(&items, &filters);
            assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        }
    }
}
