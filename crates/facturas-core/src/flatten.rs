//! Flattening a merged snapshot into tabular records.

use crate::error::{FlattenError, Result};
use crate::models::record::{ExtractionResult, FlatRecord, SnapshotEntry};

/// Flatten a merged snapshot into one record per logical invoice.
///
/// Nested sequences are descended depth-first; output order preserves
/// the traversal order and nothing is deduplicated or sorted.
pub fn flatten(snapshot: &[SnapshotEntry]) -> Result<Vec<FlatRecord>> {
    let mut records = Vec::new();
    for entry in snapshot {
        flatten_entry(entry, &mut records)?;
    }
    Ok(records)
}

fn flatten_entry(entry: &SnapshotEntry, records: &mut Vec<FlatRecord>) -> Result<()> {
    match entry {
        SnapshotEntry::Nested(entries) => {
            for inner in entries {
                flatten_entry(inner, records)?;
            }
        }
        SnapshotEntry::Invoice(result) => records.push(flatten_invoice(result)?),
    }
    Ok(())
}

/// Build one flat record from a single extraction result.
///
/// Scalar fields were already default-filled at deserialization time.
/// A product entry without a name is a hard error rather than being
/// silently dropped.
fn flatten_invoice(result: &ExtractionResult) -> Result<FlatRecord> {
    let mut products = Vec::with_capacity(result.purchased_products.len());
    for (index, product) in result.purchased_products.iter().enumerate() {
        let name = product
            .product_name
            .clone()
            .ok_or_else(|| FlattenError::MissingProductName {
                record: record_label(result),
                index,
            })?;
        products.push(name);
    }

    Ok(FlatRecord {
        category: result.purchase_category.clone(),
        store_name: result.store_name.clone(),
        amount: result.total_amount.clone(),
        purchase_concept: result.purchase_concept.clone(),
        invoice_number: result.invoice_number.clone(),
        image_name: result.file_name.clone(),
        products,
    })
}

/// Label used to identify an invoice in flatten errors.
fn record_label(result: &ExtractionResult) -> String {
    if result.file_name.is_empty() {
        "<unnamed>".to_string()
    } else {
        result.file_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(json: &str) -> SnapshotEntry {
        serde_json::from_str(json).unwrap()
    }

    fn snapshot(json: &str) -> Vec<SnapshotEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_farmacia_scenario() {
        let input = entry(
            r#"{"Categoria_de_Compra":"Farmacia","Nombre_del_Local":"Farmacia X",
                "Monto":"100",
                "Lista_de_Productos_Comprados":[{"Producto":"Aspirina","Precio_Total":"50"}]}"#,
        );

        let records = flatten(&[input]).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.category, "Farmacia");
        assert_eq!(record.store_name, "Farmacia X");
        assert_eq!(record.amount, "100");
        assert_eq!(record.products, vec!["Aspirina"]);
        assert_eq!(record.purchase_concept, "");
        assert_eq!(record.invoice_number, "");
        assert_eq!(record.image_name, "");
    }

    #[test]
    fn test_empty_object_yields_one_fully_defaulted_record() {
        let records = flatten(&[entry("{}")]).unwrap();
        assert_eq!(records, vec![FlatRecord::default()]);
    }

    #[test]
    fn test_nested_entries_flatten_depth_first() {
        let input = snapshot(
            r#"[{"File_Name":"a.jpg"},[{"File_Name":"b.jpg"},{"File_Name":"c.jpg"}]]"#,
        );
        let names: Vec<String> = flatten(&input)
            .unwrap()
            .into_iter()
            .map(|r| r.image_name)
            .collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_flattening_is_associative_over_nesting() {
        let nested = snapshot(
            r#"[{"File_Name":"a.jpg"},[{"File_Name":"b.jpg"},{"File_Name":"c.jpg"}]]"#,
        );
        let flat = snapshot(
            r#"[{"File_Name":"a.jpg"},{"File_Name":"b.jpg"},{"File_Name":"c.jpg"}]"#,
        );
        assert_eq!(flatten(&nested).unwrap(), flatten(&flat).unwrap());
    }

    #[test]
    fn test_deeply_nested_entries_are_reached() {
        let input = snapshot(r#"[[[{"File_Name":"deep.jpg"}]]]"#);
        let records = flatten(&input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image_name, "deep.jpg");
    }

    #[test]
    fn test_duplicate_invoices_are_kept() {
        let input = snapshot(r#"[{"Monto":"9"},{"Monto":"9"}]"#);
        let records = flatten(&input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_missing_product_name_is_a_hard_error() {
        let input = entry(
            r#"{"File_Name":"f.jpg",
                "Lista_de_Productos_Comprados":[{"Producto":"Aspirina"},{"Precio_Total":"50"}]}"#,
        );

        let err = flatten(&[input]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("product entry 1"), "got: {message}");
        assert!(message.contains("f.jpg"), "got: {message}");
    }
}
