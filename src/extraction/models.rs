//! Wire models for the OCR and structuring service responses.
//!
//! These types match the JSON returned by the extraction backend. Decoding is
//! tolerant: absent fields default, and amount-like values are accepted as
//! either JSON strings or numbers and normalized to strings so user-visible
//! values keep their exact textual form.

use serde::{Deserialize, Deserializer, Serialize};

/// Response of the OCR endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrResponse {
    /// Recognized text. Empty means the service saw nothing usable.
    #[serde(default)]
    pub text: String,
}

/// One product line recognized by the structuring service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StructuredProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub price: String,
}

/// Structured payload returned by the text-to-structured-data service.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StructuredReceipt {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_amount: String,
    /// Raw category tag; validated against the closed enumeration during
    /// reconciliation, not here.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub products: Vec<StructuredProduct>,
}

/// Immutable output of the two extraction stages.
///
/// Produced once per successful extraction and consumed when the draft is
/// built from it.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub raw_text: String,
    pub structured: StructuredReceipt,
}

/// Accepts `"23.40"`, `23.40` or `23` and yields the textual form.
pub(crate) fn decimal_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ocr_response() {
        let response: OcrResponse = serde_json::from_str(r#"{"text": "Lidl 23.40"}"#).unwrap();
        assert_eq!(response.text, "Lidl 23.40");

        let empty: OcrResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text, "");
    }

    #[test]
    fn test_deserialize_structured_receipt() {
        let json = r#"{
            "store_name": "Lidl",
            "date": "01-03-2024",
            "total_amount": "23.40",
            "category": "food",
            "products": [
                {"name": "Milk", "price": "2.10"},
                {"name": "Bread", "price": 1.35}
            ]
        }"#;

        let structured: StructuredReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(structured.store_name, "Lidl");
        assert_eq!(structured.date, "01-03-2024");
        assert_eq!(structured.total_amount, "23.40");
        assert_eq!(structured.category.as_deref(), Some("food"));
        assert_eq!(structured.products.len(), 2);
        assert_eq!(structured.products[1].price, "1.35");
    }

    #[test]
    fn test_numeric_amounts_keep_textual_form() {
        let structured: StructuredReceipt =
            serde_json::from_str(r#"{"total_amount": 23.4}"#).unwrap();
        assert_eq!(structured.total_amount, "23.4");

        let integral: StructuredReceipt =
            serde_json::from_str(r#"{"total_amount": 25}"#).unwrap();
        assert_eq!(integral.total_amount, "25");
    }

    #[test]
    fn test_absent_fields_default() {
        let structured: StructuredReceipt = serde_json::from_str("{}").unwrap();
        assert_eq!(structured.store_name, "");
        assert_eq!(structured.total_amount, "");
        assert!(structured.category.is_none());
        assert!(structured.products.is_empty());
    }
}
