//! Wire models for the receipt persistence API.

use serde::{Deserialize, Serialize};

use crate::draft::Category;
use crate::extraction::decimal_string;

/// A product row of a persisted receipt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiptProduct {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub price: String,
}

/// A stored image reference of a persisted receipt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiptImage {
    #[serde(default)]
    pub id: Option<i64>,
    /// Server-side URL of the stored image, not a preview handle.
    pub image: String,
}

/// The durable receipt record returned by the store on creation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Receipt {
    pub id: i64,
    #[serde(default)]
    pub store_name: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub warranty_months: Option<i64>,
    #[serde(default)]
    pub products: Vec<ReceiptProduct>,
    #[serde(default)]
    pub images: Vec<ReceiptImage>,
    #[serde(default)]
    pub created_at: String,
}
