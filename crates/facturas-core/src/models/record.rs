//! Extraction results, merged snapshots, and flat tabular records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured fields the vision model extracts from one invoice photo.
///
/// The model's output schema is not enforced: every scalar field falls
/// back to an empty string when absent, and fields outside the known
/// set are kept in `extra` so cached files round-trip whatever the
/// model produced. Amounts stay as opaque text because the upstream
/// model does not guarantee numeric formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(rename = "File_Name", default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,

    #[serde(rename = "Date", default, skip_serializing_if = "String::is_empty")]
    pub date: String,

    #[serde(rename = "Business_Name", default, skip_serializing_if = "String::is_empty")]
    pub business_name: String,

    #[serde(rename = "Business_Type", default, skip_serializing_if = "String::is_empty")]
    pub business_type: String,

    #[serde(rename = "Concepto_de_la_Compra", default, skip_serializing_if = "String::is_empty")]
    pub purchase_concept: String,

    #[serde(rename = "Nombre_del_Local", default, skip_serializing_if = "String::is_empty")]
    pub store_name: String,

    #[serde(rename = "Numero_de_Factura", default, skip_serializing_if = "String::is_empty")]
    pub invoice_number: String,

    #[serde(rename = "Monto", default, skip_serializing_if = "String::is_empty")]
    pub total_amount: String,

    #[serde(rename = "Descuento", default, skip_serializing_if = "String::is_empty")]
    pub discount_amount: String,

    #[serde(rename = "IVA_Total", default, skip_serializing_if = "String::is_empty")]
    pub total_tax: String,

    #[serde(rename = "Categoria_de_Compra", default, skip_serializing_if = "String::is_empty")]
    pub purchase_category: String,

    #[serde(
        rename = "Lista_de_Productos_Comprados",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub purchased_products: Vec<PurchasedProduct>,

    /// Fields the model emitted beyond the known set.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One purchased product on an invoice.
///
/// The name is deliberately not default-filled: a product entry
/// without a name is surfaced as a hard error at flatten time instead
/// of being silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchasedProduct {
    #[serde(rename = "Producto", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(rename = "Precio_Total", default, skip_serializing_if = "String::is_empty")]
    pub total_price: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the merged snapshot: a single extraction result or a
/// nested sequence of entries. Nesting appears when the model returns
/// several invoices for one photo; depth is unbounded by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotEntry {
    Invoice(ExtractionResult),
    Nested(Vec<SnapshotEntry>),
}

/// One spreadsheet row representing one logical invoice.
///
/// Every scalar field is always present (empty string when the model
/// omitted it) and `products` is always present (possibly empty), so
/// the emitted table has a stable column set regardless of which
/// fields the model returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub category: String,
    pub store_name: String,
    pub amount: String,
    pub purchase_concept: String,
    pub invoice_number: String,
    pub image_name: String,
    pub products: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let result: ExtractionResult = serde_json::from_str(r#"{"Monto":"100"}"#).unwrap();
        assert_eq!(result.total_amount, "100");
        assert_eq!(result.file_name, "");
        assert_eq!(result.store_name, "");
        assert!(result.purchased_products.is_empty());
    }

    #[test]
    fn test_object_parses_as_single_invoice_entry() {
        let entry: SnapshotEntry =
            serde_json::from_str(r#"{"Nombre_del_Local":"Farmacia X"}"#).unwrap();
        match entry {
            SnapshotEntry::Invoice(result) => assert_eq!(result.store_name, "Farmacia X"),
            SnapshotEntry::Nested(_) => panic!("expected a single invoice"),
        }
    }

    #[test]
    fn test_array_parses_as_nested_entry() {
        let entry: SnapshotEntry =
            serde_json::from_str(r#"[{"Monto":"1"},[{"Monto":"2"}]]"#).unwrap();
        match entry {
            SnapshotEntry::Nested(inner) => assert_eq!(inner.len(), 2),
            SnapshotEntry::Invoice(_) => panic!("expected a nested entry"),
        }
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(serde_json::from_str::<SnapshotEntry>("42").is_err());
    }

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let entry: SnapshotEntry =
            serde_json::from_str(r#"{"Monto":"10","Propina":"2"}"#).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("Propina"));
        assert!(json.contains("Monto"));
    }

    #[test]
    fn test_product_without_name_deserializes() {
        let product: PurchasedProduct =
            serde_json::from_str(r#"{"Precio_Total":"50"}"#).unwrap();
        assert_eq!(product.product_name, None);
        assert_eq!(product.total_price, "50");
    }

    #[test]
    fn test_empty_fields_are_not_serialized() {
        let result = ExtractionResult {
            total_amount: "100".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"Monto":"100"}"#);
    }
}
