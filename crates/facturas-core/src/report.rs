//! Spreadsheet report emission.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook};
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::models::record::FlatRecord;

/// File name of the report inside the output directory.
pub const REPORT_FILENAME: &str = "report.xlsx";

/// Column headers in emission order, one per flat-record field.
const REPORT_HEADERS: &[&str] = &[
    "Categoria de Compra",
    "Nombre del Local",
    "Monto",
    "Concepto de la Compra",
    "Numero de Factura",
    "Nombre de la Imagen",
    "Lista de Productos",
];

/// Columns whose data cells get the emphasis format.
const HIGHLIGHT_COLUMNS: &[&str] = &[
    "Concepto de la Compra",
    "Nombre del Local",
    "Numero de Factura",
    "Monto",
    "Nombre de la Imagen",
    "Categoria de Compra",
];

/// Emit the flat record set as a single-sheet spreadsheet at `path`.
///
/// Any pre-existing file is deleted first, so the report always
/// reflects exactly the records passed in. A highlight column missing
/// from the emitted header set is skipped with a warning, not an
/// error.
pub fn write_report(records: &[FlatRecord], path: &Path, sheet_name: &str) -> Result<()> {
    if path.exists() {
        debug!(path = %path.display(), "Deleting old report");
        std::fs::remove_file(path).map_err(ReportError::Io)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(ReportError::Xlsx)?;

    let header_format = Format::new().set_bold();
    let highlight_format = Format::new().set_bold().set_font_color(Color::Red);
    let plain_format = Format::new();
    let highlighted = highlight_flags();

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(ReportError::Xlsx)?;
        worksheet
            .set_column_width(col as u16, estimate_width(header))
            .map_err(ReportError::Xlsx)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        let cells = record_cells(record)?;
        for (col, value) in cells.iter().enumerate() {
            let format = if highlighted[col] {
                &highlight_format
            } else {
                &plain_format
            };
            worksheet
                .write_string_with_format(row, col as u16, value, format)
                .map_err(ReportError::Xlsx)?;
        }
    }

    workbook.save(path).map_err(ReportError::Xlsx)?;
    info!(rows = records.len(), path = %path.display(), "Report written");
    Ok(())
}

/// Cell values of one record, in `REPORT_HEADERS` order. The products
/// column holds the JSON list representation of the product names.
fn record_cells(record: &FlatRecord) -> Result<[String; 7]> {
    Ok([
        record.category.clone(),
        record.store_name.clone(),
        record.amount.clone(),
        record.purchase_concept.clone(),
        record.invoice_number.clone(),
        record.image_name.clone(),
        serde_json::to_string(&record.products)?,
    ])
}

/// Per-column highlight flags. Highlight names matching no emitted
/// column are reported and skipped.
fn highlight_flags() -> [bool; REPORT_HEADERS.len()] {
    let mut flags = [false; REPORT_HEADERS.len()];
    for name in HIGHLIGHT_COLUMNS {
        match REPORT_HEADERS.iter().position(|h| h == name) {
            Some(idx) => flags[idx] = true,
            None => warn!(column = name, "Highlight column not present in report, skipping"),
        }
    }
    flags
}

/// Estimate column width from header text length.
fn estimate_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(12.0, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> FlatRecord {
        FlatRecord {
            category: "Farmacia".to_string(),
            store_name: "Farmacia X".to_string(),
            amount: "100".to_string(),
            purchase_concept: "Medicamentos".to_string(),
            invoice_number: "001-234".to_string(),
            image_name: "foto.jpg".to_string(),
            products: vec!["Aspirina".to_string(), "Paracetamol".to_string()],
        }
    }

    #[test]
    fn test_one_column_per_record_field() {
        // FlatRecord has six scalar fields plus the product list.
        assert_eq!(REPORT_HEADERS.len(), 7);
    }

    #[test]
    fn test_every_highlight_column_exists() {
        for name in HIGHLIGHT_COLUMNS {
            assert!(REPORT_HEADERS.contains(name), "missing: {name}");
        }
    }

    #[test]
    fn test_products_cell_uses_list_representation() {
        let cells = record_cells(&sample_record()).unwrap();
        assert_eq!(cells[6], r#"["Aspirina","Paracetamol"]"#);
    }

    #[test]
    fn test_report_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);
        write_report(&[sample_record()], &path, "Report").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_existing_report_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);
        std::fs::write(&path, "old report placeholder").unwrap();

        write_report(&[], &path, "Report").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx files are zip archives; the placeholder is gone.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_record_set_still_writes_header_only_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);
        write_report(&[], &path, "Report").unwrap();
        assert!(path.exists());
    }
}
