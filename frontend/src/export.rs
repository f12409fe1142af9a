//! Spreadsheet export.
//!
//! Serializes the currently materialized history (plus a summary) into a
//! three-sheet workbook and hands it to the browser as a download. The
//! workbook builder is pure; only `trigger_download` touches the DOM.

use chrono::Local;
use common::model::product::{FoundProduct, NotFoundProduct};
use gloo_file::{Blob, ObjectUrl};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use wasm_bindgen::JsCast;

use crate::filters::format_datahora;

const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Builds the workbook: one sheet per collection with human-labeled
/// columns, plus a summary sheet. The summary prefers the
/// server-reported totals when supplied, falling back to the
/// materialized lengths.
pub fn build_workbook(
    found: &[FoundProduct],
    not_found: &[NotFoundProduct],
    totals: Option<(u64, u64)>,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Produtos Encontrados")?;
    for (col, label) in ["ID", "Código Auxiliar", "Código Produto", "Descrição", "Data/Hora"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *label, &header)?;
    }
    for (row, item) in found.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_number(row, 0, item.id as f64)?;
        sheet.write_string(row, 1, &item.codauxiliar)?;
        sheet.write_string(row, 2, &item.codprod)?;
        sheet.write_string(row, 3, item.descricao.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 4, format_datahora(&item.datahora))?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Produtos Não Encontrados")?;
    for (col, label) in ["ID", "Código Auxiliar", "Descrição", "Data/Hora"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *label, &header)?;
    }
    for (row, item) in not_found.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_number(row, 0, item.id as f64)?;
        sheet.write_string(row, 1, &item.codauxiliar)?;
        sheet.write_string(row, 2, item.descricao.as_deref().unwrap_or("Sem descrição"))?;
        sheet.write_string(row, 3, format_datahora(&item.datahora))?;
    }

    let (found_count, not_found_count) =
        totals.unwrap_or((found.len() as u64, not_found.len() as u64));
    let sheet = workbook.add_worksheet();
    sheet.set_name("Resumo")?;
    sheet.write_string_with_format(0, 0, "Tipo", &header)?;
    sheet.write_string_with_format(0, 1, "Quantidade", &header)?;
    let rows = [
        ("Produtos Encontrados", found_count),
        ("Produtos Não Encontrados", not_found_count),
        ("Total de Buscas", found_count + not_found_count),
    ];
    for (row, (label, count)) in rows.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *count as f64)?;
    }

    workbook.save_to_buffer()
}

/// `produtos_<YYYY-MM-DD>.xlsx`, dated with the local clock.
pub fn export_file_name() -> String {
    format!("produtos_{}.xlsx", Local::now().format("%Y-%m-%d"))
}

/// Hands the workbook bytes to the browser through an object URL and a
/// synthetic anchor click.
pub fn trigger_download(bytes: &[u8], file_name: &str) {
    let blob = Blob::new_with_options(bytes, Some(XLSX_MIME));
    let url = ObjectUrl::from(blob);
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        if let Ok(anchor) = document.create_element("a") {
            let _ = anchor.set_attribute("href", &url);
            let _ = anchor.set_attribute("download", file_name);
            if let Ok(anchor) = anchor.dyn_into::<web_sys::HtmlElement>() {
                anchor.click();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(id: i64) -> FoundProduct {
        FoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: "7891000100103".into(),
            codprod: "55821".into(),
            descricao: Some("LEITE CONDENSADO 395G".into()),
            datahora: "2025-08-12T14:03:55".into(),
        }
    }

    fn not_found(id: i64) -> NotFoundProduct {
        NotFoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: "0000000000000".into(),
            descricao: None,
            datahora: "2025-08-12T14:05:00".into(),
        }
    }

    #[test]
    fn workbook_is_a_valid_zip_container() {
        let bytes = build_workbook(&[found(1)], &[not_found(2)], None).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_history_still_exports() {
        let bytes = build_workbook(&[], &[], Some((0, 0))).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn timestamps_render_as_pt_br_day_first() {
        assert_eq!(format_datahora("2025-08-12T14:03:55"), "12/08/2025 14:03");
        assert_eq!(format_datahora("quando?"), "quando?");
    }

    #[test]
    fn file_name_is_dated() {
        let name = export_file_name();
        assert!(name.starts_with("produtos_"));
        assert!(name.ends_with(".xlsx"));
    }
}
